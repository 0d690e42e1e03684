//! Storage abstraction trait
//!
//! Defines the `Storage` trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

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

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// orchestrators can work with any backend without branching on its
/// identity.
///
/// **Key format:** `documents/{YYYY}/{MM}/{filename}`; see the crate root
/// documentation. The key returned by `store` is the only handle the rest
/// of the system holds on the bytes.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `content` under `filename` and return the storage path.
    ///
    /// The key's year/month partition is derived from `uploaded_at`, the
    /// same timestamp the caller embeds in `filename`, so the two never
    /// disagree across a month boundary. A returned path means the write
    /// fully succeeded; backends never report success for a partial write.
    async fn store(
        &self,
        content: Vec<u8>,
        filename: &str,
        content_type: &str,
        uploaded_at: DateTime<Utc>,
    ) -> StorageResult<String>;

    /// Produce an access URL for a stored object.
    ///
    /// The local backend returns a stable URL under its public mount
    /// prefix and ignores `expires_in`; the S3 backend returns a presigned
    /// GET URL valid for `expires_in` from issuance.
    async fn url_for(&self, storage_path: &str, expires_in: Duration) -> StorageResult<String>;

    /// Delete a stored object.
    ///
    /// Returns whether bytes were actually removed. Deleting an absent
    /// object is never an error: the local backend reports `Ok(false)`,
    /// S3's delete-object call is idempotent and reports `Ok(true)` when
    /// the call succeeds.
    async fn delete(&self, storage_path: &str) -> StorageResult<bool>;

    /// Check if an object exists
    async fn exists(&self, storage_path: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
