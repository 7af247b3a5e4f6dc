//! Adapter layer: convert wire DTOs to domain models
//!
//! This is the ONLY place where DTO types become domain types. If the remote
//! service changes its response format, only this file and dto.rs change.

use tracing::warn;

use super::domain::{Album, RemoteImage};
use super::dto;

/// Convert parsed `<Album>` elements to domain albums.
///
/// Elements missing an ID or title cannot be resolved or listed and are
/// dropped with a warning.
pub fn to_albums(albums: Vec<dto::AlbumDto>) -> Vec<Album> {
    albums
        .into_iter()
        .filter_map(|album| match (album.id, album.title) {
            (Some(id), Some(title)) => Some(Album {
                id,
                key: album.key,
                title,
            }),
            (id, title) => {
                warn!(?id, ?title, "skipping album entry with missing fields");
                None
            }
        })
        .collect()
}

/// Convert parsed `<Image>` elements to domain images.
///
/// The local filename is derived from the URL's trailing path segment; entries
/// without a usable URL (light listings, or URLs ending in `/`) carry nothing
/// to mirror and are dropped with a warning.
pub fn to_images(images: Vec<dto::ImageDto>) -> Vec<RemoteImage> {
    images
        .into_iter()
        .filter_map(|image| {
            let Some(url) = image.large_url else {
                warn!(id = ?image.id, "skipping image entry without a download URL");
                return None;
            };
            let Some(file_name) = filename_from_url(&url) else {
                warn!(id = ?image.id, %url, "skipping image with no filename segment");
                return None;
            };
            Some(RemoteImage { url, file_name })
        })
        .collect()
}

/// Derive the local join key for a retrieval URL: the final `/`-delimited
/// path segment, with any query string or fragment stripped.
///
/// Returns `None` when the URL ends in `/` (no filename segment). Files can
/// be matched to remote state without sidecar metadata this way, at the cost
/// of breaking if the service ever renames its URLs for the same image.
pub fn filename_from_url(url: &str) -> Option<String> {
    let path = url
        .split_once(['?', '#'])
        .map(|(path, _)| path)
        .unwrap_or(url);
    let segment = path.rsplit('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}
