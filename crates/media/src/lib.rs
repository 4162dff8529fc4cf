//! Media transform gateway.
//!
//! [`transform`] holds the pure resize/re-encode step; [`storage`] holds the
//! client for the remote object store. The two are intentionally separate so
//! handlers can transform first and only touch the network once the bytes
//! are final.

pub mod storage;
pub mod transform;

pub use storage::{MediaStorage, MediaStorageConfig, UploadedAsset};
pub use transform::{resize_and_optimize, ImageFit, OutputFormat};

/// Error type for media transforms and remote storage calls.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The requested output format is not one of webp/jpg/jpeg/png.
    #[error("Invalid image format: {0}")]
    InvalidFormat(String),

    /// The input bytes could not be decoded or re-encoded.
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Empty/missing upload input or an empty remote response.
    #[error("Bad upload: {0}")]
    BadUpload(String),

    /// HTTP transport failure talking to the remote store.
    #[error("Media store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote store answered with a non-success status.
    #[error("Media store rejected the request: {0}")]
    Rejected(String),
}
