//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\album-minder\config.toml
//! - macOS: ~/Library/Application Support/album-minder/config.toml
//! - Linux: ~/.config/album-minder/config.toml
//!
//! The config file is human-readable and editable. It supplies defaults for
//! flags the user does not pass on the command line (API key, nickname,
//! mirror root, request timeout).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Remote service settings
    pub remote: RemoteConfig,

    /// Mirror settings
    pub mirror: MirrorConfig,
}

/// API credentials
///
/// Only the API key is required. When an email/password pair or a user
/// ID/password hash pair is present, login upgrades from anonymous to an
/// account session (the hash pair wins when both are set).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Gallery API key
    pub api_key: Option<String>,

    /// Account email for password login
    pub email: Option<String>,

    /// Account password for password login
    pub password: Option<String>,

    /// Numeric user ID for hash login
    pub user_id: Option<String>,

    /// Encrypted password hash for hash login, as returned by a password login
    pub password_hash: Option<String>,
}

/// Remote service settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Default user nickname (the first part of the user's gallery URL)
    pub nickname: Option<String>,

    /// Per-request timeout in seconds; unset keeps the transport default
    pub timeout_secs: Option<u64>,
}

/// Mirror settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Root directory that album directories are created under.
    /// Unset means the current working directory.
    pub root: Option<PathBuf>,
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("album-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    // Ensure directory exists
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[remote]"));
        assert!(toml.contains("[mirror]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.credentials.api_key = Some("test-key-123".to_string());
        config.remote.nickname = Some("bob".to_string());
        config.remote.timeout_secs = Some(30);
        config.mirror.root = Some(PathBuf::from("/photos"));

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.credentials.api_key, Some("test-key-123".to_string()));
        assert_eq!(parsed.remote.nickname, Some("bob".to_string()));
        assert_eq!(parsed.remote.timeout_secs, Some(30));
        assert_eq!(parsed.mirror.root, Some(PathBuf::from("/photos")));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[credentials]\napi_key = \"k\"\n").unwrap();
        assert_eq!(parsed.credentials.api_key, Some("k".to_string()));
        assert!(parsed.remote.nickname.is_none());
        assert!(parsed.mirror.root.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let parsed: Config =
            toml::from_str("[remote]\nnickname = \"bob\"\nfuture_option = true\n").unwrap();
        assert_eq!(parsed.remote.nickname, Some("bob".to_string()));
    }
}
