//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed arguments
//! and returns an `anyhow::Result<()>`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::gallery::{GalleryClient, Session};
use crate::{config, error, mirror};

/// Album Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Mirror a remote album into a local directory
    Sync {
        /// Album name (matched case-insensitively against album titles)
        album: String,
        /// Gallery API key (or set SMUGMUG_API_KEY env var)
        #[arg(short = 'k', long, env = "SMUGMUG_API_KEY")]
        api_key: Option<String>,
        /// User nickname, i.e. "bob" in bob.smugmug.com
        #[arg(short, long, env = "SMUGMUG_NICKNAME")]
        nickname: Option<String>,
        /// Target directory (default: a directory named after the album)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Suppress the summary output
        #[arg(short, long)]
        quiet: bool,
    },
    /// List a user's albums
    Albums {
        /// Gallery API key (or set SMUGMUG_API_KEY env var)
        #[arg(short = 'k', long, env = "SMUGMUG_API_KEY")]
        api_key: Option<String>,
        /// User nickname
        #[arg(short, long, env = "SMUGMUG_NICKNAME")]
        nickname: Option<String>,
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List the image files in one album
    Images {
        /// Album name (matched case-insensitively against album titles)
        album: String,
        /// Gallery API key (or set SMUGMUG_API_KEY env var)
        #[arg(short = 'k', long, env = "SMUGMUG_API_KEY")]
        api_key: Option<String>,
        /// User nickname
        #[arg(short, long, env = "SMUGMUG_NICKNAME")]
        nickname: Option<String>,
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Save API key and nickname defaults to the config file
    Init {
        /// Gallery API key to store
        #[arg(short = 'k', long, env = "SMUGMUG_API_KEY")]
        api_key: Option<String>,
        /// User nickname to store
        #[arg(short, long, env = "SMUGMUG_NICKNAME")]
        nickname: Option<String>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Sync {
            album,
            api_key,
            nickname,
            dir,
            quiet,
        } => cmd_sync(
            &rt,
            album,
            api_key.as_deref(),
            nickname.as_deref(),
            dir.as_ref(),
            *quiet,
        ),
        Commands::Albums {
            api_key,
            nickname,
            format,
        } => cmd_albums(&rt, api_key.as_deref(), nickname.as_deref(), format),
        Commands::Images {
            album,
            api_key,
            nickname,
            format,
        } => cmd_images(&rt, album, api_key.as_deref(), nickname.as_deref(), format),
        Commands::Init { api_key, nickname } => cmd_init(api_key.as_deref(), nickname.as_deref()),
    }
}

// ============================================================================
// Individual command implementations
// ============================================================================

fn cmd_sync(
    rt: &Runtime,
    album: &str,
    api_key: Option<&str>,
    nickname: Option<&str>,
    dir: Option<&PathBuf>,
    quiet: bool,
) -> anyhow::Result<()> {
    let config = config::load();
    let api_key = require_api_key(api_key, &config);
    let nickname = require_nickname(nickname, &config);

    // Default target: <mirror root or cwd>/<sanitized album name>
    let target_dir = dir.cloned().unwrap_or_else(|| {
        config
            .mirror
            .root
            .clone()
            .unwrap_or_default()
            .join(mirror::sanitize_dir_name(album))
    });

    rt.block_on(async {
        let client = gallery_client(&api_key, &config);
        let session = authenticate_or_exit(&client, &config).await;

        let mirror = mirror::Mirror::new(client);
        match mirror.sync(&session, &nickname, album, &target_dir).await {
            Ok(report) => {
                for failure in &report.failures {
                    let verb = match failure.action {
                        mirror::TransferAction::Download => "downloading",
                        mirror::TransferAction::Delete => "deleting",
                    };
                    eprintln!("ERROR {} {}: {}", verb, failure.file, failure.error);
                }
                if !quiet {
                    println!(
                        "Synced {:?}: {} added, {} removed, {} unchanged",
                        target_dir,
                        report.added.len(),
                        report.removed.len(),
                        report.unchanged
                    );
                }
                if !report.is_clean() {
                    eprintln!("Completed with {} error(s)", report.failures.len());
                    std::process::exit(1);
                }
            }
            Err(e @ error::Error::AlbumNotFound(_)) => {
                eprintln!("Error: {}", e);
                eprintln!("Use the albums command to list available albums.");
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    });
    Ok(())
}

fn cmd_albums(
    rt: &Runtime,
    api_key: Option<&str>,
    nickname: Option<&str>,
    format: &str,
) -> anyhow::Result<()> {
    let config = config::load();
    let api_key = require_api_key(api_key, &config);
    let nickname = require_nickname(nickname, &config);

    rt.block_on(async {
        let client = gallery_client(&api_key, &config);
        let session = authenticate_or_exit(&client, &config).await;

        match client.albums(&session, &nickname).await {
            Ok(albums) => match format {
                "json" => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&albums)
                            .expect("album listing serializes")
                    );
                }
                _ => {
                    for album in &albums {
                        println!("{} - {}", album.id, album.title);
                    }
                    println!("{} album(s)", albums.len());
                }
            },
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }

        // Best effort; the session dies with the process anyway
        let _ = client.logout(&session).await;
    });
    Ok(())
}

fn cmd_images(
    rt: &Runtime,
    album: &str,
    api_key: Option<&str>,
    nickname: Option<&str>,
    format: &str,
) -> anyhow::Result<()> {
    let config = config::load();
    let api_key = require_api_key(api_key, &config);
    let nickname = require_nickname(nickname, &config);

    rt.block_on(async {
        let client = gallery_client(&api_key, &config);
        let session = authenticate_or_exit(&client, &config).await;

        let albums = match client.albums(&session, &nickname).await {
            Ok(albums) => albums,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        let Some(found) = mirror::find_album(&albums, album) else {
            eprintln!("Error: album not found: {}", album);
            std::process::exit(1);
        };

        match client.images(&session, found.id).await {
            Ok(images) => match format {
                "json" => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&images)
                            .expect("image listing serializes")
                    );
                }
                _ => {
                    for image in &images {
                        println!("{} - {}", image.file_name, image.url);
                    }
                    println!("{} image(s)", images.len());
                }
            },
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }

        // Best effort; the session dies with the process anyway
        let _ = client.logout(&session).await;
    });
    Ok(())
}

fn cmd_init(api_key: Option<&str>, nickname: Option<&str>) -> anyhow::Result<()> {
    if api_key.is_none() && nickname.is_none() {
        return Err(error::Error::config(
            "nothing to save: provide --api-key and/or --nickname",
        )
        .into());
    }

    // Overlay the provided values on whatever is already stored
    let mut config = config::load();
    if let Some(api_key) = api_key {
        config.credentials.api_key = Some(api_key.to_string());
    }
    if let Some(nickname) = nickname {
        config.remote.nickname = Some(nickname.to_string());
    }
    config::save(&config)?;

    if let Some(path) = config::config_path() {
        println!("Saved {:?}", path);
    }
    Ok(())
}

// ============================================================================
// Helper functions
// ============================================================================

/// Build the gallery client with the configured request timeout
fn gallery_client(api_key: &str, config: &config::Config) -> GalleryClient {
    let timeout = config.remote.timeout_secs.map(Duration::from_secs);
    GalleryClient::new(api_key, timeout)
}

/// Log in, exiting with a message on failure.
///
/// Anonymous login by default; configured credentials upgrade it to an
/// account session, preferring the hash pair over email/password.
async fn authenticate_or_exit(client: &GalleryClient, config: &config::Config) -> Session {
    let credentials = &config.credentials;
    let result = if let (Some(user_id), Some(hash)) =
        (&credentials.user_id, &credentials.password_hash)
    {
        client.authenticate_with_hash(user_id, hash).await
    } else if let (Some(email), Some(password)) = (&credentials.email, &credentials.password) {
        client.authenticate_with_password(email, password).await
    } else {
        client.authenticate().await
    };

    match result {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// API key from flag/env, falling back to the config file
fn require_api_key(flag: Option<&str>, config: &config::Config) -> String {
    flag.map(str::to_string)
        .or_else(|| config.credentials.api_key.clone())
        .unwrap_or_else(|| {
            eprintln!("Error: gallery API key required.");
            eprintln!("Use --api-key YOUR_KEY, set SMUGMUG_API_KEY, or add it to the config file.");
            std::process::exit(1);
        })
}

/// Nickname from flag/env, falling back to the config file
fn require_nickname(flag: Option<&str>, config: &config::Config) -> String {
    flag.map(str::to_string)
        .or_else(|| config.remote.nickname.clone())
        .unwrap_or_else(|| {
            eprintln!("Error: user nickname required.");
            eprintln!("Use --nickname NAME, set SMUGMUG_NICKNAME, or add it to the config file.");
            std::process::exit(1);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sync_args() {
        let cli = Cli::parse_from([
            "album-minder",
            "sync",
            "Vacation",
            "--api-key",
            "k",
            "--nickname",
            "bob",
            "--quiet",
        ]);
        match cli.command {
            Commands::Sync {
                album,
                api_key,
                nickname,
                dir,
                quiet,
            } => {
                assert_eq!(album, "Vacation");
                assert_eq!(api_key.as_deref(), Some("k"));
                assert_eq!(nickname.as_deref(), Some("bob"));
                assert!(dir.is_none());
                assert!(quiet);
            }
            _ => panic!("expected sync command"),
        }
    }

    #[test]
    fn test_albums_format_default() {
        let cli = Cli::parse_from(["album-minder", "albums", "-k", "k", "-n", "bob"]);
        match cli.command {
            Commands::Albums { format, .. } => assert_eq!(format, "text"),
            _ => panic!("expected albums command"),
        }
    }
}
