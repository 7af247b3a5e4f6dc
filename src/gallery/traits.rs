//! Trait definition for the gallery client.
//!
//! This trait enables dependency injection and mocking for tests. Production
//! code uses [`GalleryClient`](super::GalleryClient); tests substitute a mock
//! that serves canned inventories without touching the network.

use async_trait::async_trait;

use super::domain::{Album, GalleryError, RemoteImage, Session};

/// The read-only gallery operations the mirror depends on
#[async_trait]
pub trait GalleryApi: Send + Sync {
    /// List the albums visible to this session for the given user nickname
    async fn albums(&self, session: &Session, nickname: &str)
    -> Result<Vec<Album>, GalleryError>;

    /// List the images in one album, download URLs included
    async fn images(
        &self,
        session: &Session,
        album_id: u64,
    ) -> Result<Vec<RemoteImage>, GalleryError>;

    /// Download raw image bytes from a retrieval URL
    async fn download(&self, url: &str) -> Result<Vec<u8>, GalleryError>;
}

#[async_trait]
impl GalleryApi for super::client::GalleryClient {
    async fn albums(
        &self,
        session: &Session,
        nickname: &str,
    ) -> Result<Vec<Album>, GalleryError> {
        self.albums(session, nickname).await
    }

    async fn images(
        &self,
        session: &Session,
        album_id: u64,
    ) -> Result<Vec<RemoteImage>, GalleryError> {
        self.images(session, album_id).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GalleryError> {
        self.download(url).await
    }
}
