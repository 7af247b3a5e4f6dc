//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`GalleryError`](crate::gallery::GalleryError))
//!   for detailed handling
//! - Structural errors (album resolution, inventory listing) abort a run;
//!   per-file transfer errors never appear here - they are aggregated into
//!   the run's report instead

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Gallery service error (authentication, API, transport, parse)
    #[error("Gallery error: {0}")]
    Gallery(#[from] crate::gallery::GalleryError),

    /// The named album does not exist for the given user
    #[error("Album not found: {0}")]
    AlbumNotFound(String),

    /// The album exists but has no images
    #[error("Album has no images: {0}")]
    EmptyAlbum(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an album-not-found error.
    pub fn album_not_found(name: impl Into<String>) -> Self {
        Self::AlbumNotFound(name.into())
    }

    /// Create an empty-album error.
    pub fn empty_album(name: impl Into<String>) -> Self {
        Self::EmptyAlbum(name.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::album_not_found("Vacation");
        assert!(err.to_string().contains("Vacation"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::empty_album("Vacation").context("while syncing");
        let msg = err.to_string();
        assert!(msg.contains("while syncing"));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(Error::config("missing api key"));
        let with_ctx = result.with_context("additional context");
        assert!(
            with_ctx
                .unwrap_err()
                .to_string()
                .contains("additional context")
        );
    }

    #[test]
    fn test_gallery_error_converts() {
        let gallery_err = crate::gallery::GalleryError::Auth("denied".to_string());
        let err: Error = gallery_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
