//! Internal domain models for the gallery service.
//!
//! These types are OUR types - they don't change when the remote API changes.
//! All wire responses get converted into these types via the adapter.

use serde::Serialize;

/// Proof of a successful login.
///
/// Every authenticated call takes a `&Session`, so "not logged in" is not a
/// runtime state the listing calls can observe.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session token issued by the service
    pub id: String,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A named, numbered collection of images on the remote service
#[derive(Debug, Clone, Serialize)]
pub struct Album {
    /// Numeric album ID
    pub id: u64,
    /// Album key, needed alongside the ID by some API methods
    pub key: Option<String>,
    /// Human-readable title, the case-insensitive match key for resolution
    pub title: String,
}

/// One image in a remote album
#[derive(Debug, Clone, Serialize)]
pub struct RemoteImage {
    /// Retrieval URL for the image bytes
    pub url: String,
    /// Local filename derived from the URL's trailing path segment
    pub file_name: String,
}

/// Errors that can occur talking to the gallery service
#[derive(Debug, Clone, thiserror::Error)]
pub enum GalleryError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error {code}: {message}")]
    Api { code: u32, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = GalleryError::Api {
            code: 5,
            message: "invalid login".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains("invalid login"));
    }

    #[test]
    fn test_auth_error_display() {
        let err = GalleryError::Auth("system error".to_string());
        assert!(err.to_string().contains("Authentication failed"));
    }
}
