//! Storage abstraction trait
//!
//! All storage backends (S3, local filesystem) implement this trait, so the
//! rest of the service never couples to a specific provider.

use async_trait::async_trait;
use mentora_core::models::UserId;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob store contract.
///
/// `upload` and `put_text` each generate a fresh key under the user's
/// namespace and return `(storage_key, storage_url)`: the key is the stable
/// locator persisted with the upload record, the URL is the backend-specific
/// address of the object.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store an uploaded file under the user's namespace.
    async fn upload(
        &self,
        user_id: &UserId,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)>;

    /// Store a text description as a `.txt` object under the user's namespace.
    async fn put_text(&self, user_id: &UserId, text: &str) -> StorageResult<(String, String)>;

    /// Download an object by its storage key.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by its storage key.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
