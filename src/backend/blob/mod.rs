//! Blob Store Module
//!
//! Raw byte storage for file messages. The exchange core never sees file
//! bytes; it stores the opaque reference returned here as the message content.
//!
//! - **`fs`** - `FsBlobStore`, files under a configured upload directory
//!
//! The rendering side derives a MIME type from the reference's extension with
//! `mime_guess`, see `content_type_for`.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Filesystem blob store
pub mod fs;

pub use fs::FsBlobStore;

#[derive(Debug, Error)]
pub enum BlobError {
    /// No blob behind this reference
    #[error("Blob '{0}' not found")]
    NotFound(String),

    /// Reference is not one this store could have issued
    #[error("Invalid blob reference '{0}'")]
    InvalidReference(String),

    #[error("Blob I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte storage addressed by opaque references
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Save `bytes` and return a stable reference to them
    ///
    /// `original_name` is the client-supplied file name, used only to keep
    /// its extension.
    async fn store(&self, original_name: Option<&str>, bytes: Bytes) -> Result<String, BlobError>;

    /// Read back the bytes behind `reference`
    async fn retrieve(&self, reference: &str) -> Result<Bytes, BlobError>;

    /// Delete the blob behind `reference`
    async fn remove(&self, reference: &str) -> Result<(), BlobError>;
}

/// MIME type for a blob reference, from its extension
pub fn content_type_for(reference: &str) -> String {
    mime_guess::from_path(reference)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
