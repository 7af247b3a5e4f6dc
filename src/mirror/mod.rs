//! Album mirror - converges a local directory to one remote album's image set.
//!
//! The flow for one run:
//! 1. Resolve the album name to an ID (first case-insensitive title match)
//! 2. Fetch the remote inventory, keyed by the URL-derived filenames
//! 3. Create the target directory if absent
//! 4. Enumerate local `.jpg` files
//! 5. Plan additions and deletions ([`diff`])
//! 6. Apply all downloads, then all deletions
//!
//! Listing failures abort the run; per-file transfer failures are collected
//! into the [`SyncReport`] and the run continues. Deletions never start before
//! every download has either completed or been reported, so a file on disk is
//! never lost to a half-finished run.

pub mod diff;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result, ResultExt};
use crate::gallery::{Album, GalleryApi, Session};

/// Which transfer operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferAction {
    Download,
    Delete,
}

/// One per-file failure from a sync run
#[derive(Debug, Clone)]
pub struct TransferFailure {
    /// Join key of the affected file
    pub file: String,
    pub action: TransferAction,
    pub error: String,
}

/// Summary of one sync run
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Files downloaded this run
    pub added: Vec<String>,
    /// Files deleted this run
    pub removed: Vec<String>,
    /// Files already present on both sides
    pub unchanged: usize,
    /// Per-file failures; the run continued past each of these
    pub failures: Vec<TransferFailure>,
}

impl SyncReport {
    /// Whether the run completed without any per-file failure
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One-way mirror of a remote album into a local directory
pub struct Mirror<G: GalleryApi> {
    gallery: G,
}

impl<G: GalleryApi> Mirror<G> {
    pub fn new(gallery: G) -> Self {
        Self { gallery }
    }

    /// Converge `target_dir` to match the named remote album.
    ///
    /// Fails before touching the filesystem if the album cannot be resolved
    /// or has no images.
    pub async fn sync(
        &self,
        session: &Session,
        nickname: &str,
        album_name: &str,
        target_dir: &Path,
    ) -> Result<SyncReport> {
        // Step 1: resolve the album name
        let album = self.resolve_album(session, nickname, album_name).await?;
        info!(album = %album.title, id = album.id, "resolved album");

        // Step 2: remote inventory, keyed by derived filename
        let remote = self.remote_inventory(session, &album).await?;
        if remote.is_empty() {
            return Err(Error::empty_album(&album.title));
        }

        // Steps 3-4: directory exists before anything enumerates or writes it
        fs::create_dir_all(target_dir)
            .with_context(format!("Failed to create directory: {:?}", target_dir))?;
        let local = local_inventory(target_dir)?;
        debug!(remote = remote.len(), local = local.len(), "inventories loaded");

        // Step 5: plan
        let plan = diff::plan(&remote, &local);
        if plan.is_empty() {
            info!("local directory already up to date");
        }

        let mut report = SyncReport {
            unchanged: plan.unchanged,
            ..Default::default()
        };

        // Step 6: downloads, best effort
        for name in &plan.to_add {
            let url = &remote[name];
            match self.fetch_image(url, &target_dir.join(name)).await {
                Ok(()) => {
                    info!(file = %name, "downloaded");
                    report.added.push(name.clone());
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "download failed");
                    report.failures.push(TransferFailure {
                        file: name.clone(),
                        action: TransferAction::Download,
                        error: e.to_string(),
                    });
                }
            }
        }

        // Step 7: deletions, strictly after all downloads
        for name in &plan.to_delete {
            match fs::remove_file(target_dir.join(name)) {
                Ok(()) => {
                    info!(file = %name, "removed");
                    report.removed.push(name.clone());
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "delete failed");
                    report.failures.push(TransferFailure {
                        file: name.clone(),
                        action: TransferAction::Delete,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// First album whose title matches `album_name` case-insensitively
    async fn resolve_album(
        &self,
        session: &Session,
        nickname: &str,
        album_name: &str,
    ) -> Result<Album> {
        let albums = self.gallery.albums(session, nickname).await?;
        find_album(&albums, album_name)
            .cloned()
            .ok_or_else(|| Error::album_not_found(album_name))
    }

    /// Map of join key to retrieval URL for one album.
    ///
    /// Remote entries whose derived keys collide keep the first URL seen;
    /// either URL names the same local file.
    async fn remote_inventory(
        &self,
        session: &Session,
        album: &Album,
    ) -> Result<BTreeMap<String, String>> {
        let images = self.gallery.images(session, album.id).await?;
        let mut inventory = BTreeMap::new();
        for image in images {
            inventory.entry(image.file_name).or_insert(image.url);
        }
        Ok(inventory)
    }

    /// Download one image and write it to its local path, overwriting any
    /// existing file
    async fn fetch_image(&self, url: &str, dest: &Path) -> Result<()> {
        let bytes = self.gallery.download(url).await?;
        fs::write(dest, bytes).with_context(format!("Failed to write file: {:?}", dest))?;
        Ok(())
    }
}

/// First album whose title matches `name` case-insensitively.
///
/// This is the one place the resolution rule lives; duplicate titles resolve
/// to whichever the service listed first.
pub fn find_album<'a>(albums: &'a [Album], name: &str) -> Option<&'a Album> {
    albums
        .iter()
        .find(|album| album.title.eq_ignore_ascii_case(name))
}

/// Names of the `.jpg` files directly inside `dir` (non-recursive)
fn local_inventory(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir).with_context(format!("Failed to read directory: {:?}", dir))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if !is_image_file(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}

/// Check if a path has the mirrored image extension (case-insensitive)
fn is_image_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    matches!(ext.as_deref(), Some("jpg"))
}

/// Sanitizes an album title for use as a directory name
pub fn sanitize_dir_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
