//! Gallery module - read-only access to the remote photo-hosting service.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - internal types that represent our business logic
//! - **Wire DTOs** (`dto.rs`) - exact REST response shapes and the XML parser
//! - **Adapter** (`adapter.rs`) - converts DTOs to domain models
//! - **Client** (`client.rs`) - HTTP client for the REST endpoint
//! - **Traits** (`traits.rs`) - the seam the mirror depends on, mockable in tests
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test the wire contract independently
//! 3. The mirror core is tested without a network
//!
//! # Usage
//!
//! ```ignore
//! use album_minder::gallery::GalleryClient;
//!
//! let client = GalleryClient::new(api_key, None);
//! let session = client.authenticate().await?;
//! let albums = client.albums(&session, "bob").await?;
//! ```

pub mod adapter;
pub mod client;
pub mod domain;
pub mod dto;
pub mod traits;

pub use client::GalleryClient;
pub use domain::{Album, GalleryError, RemoteImage, Session};
pub use traits::GalleryApi;
