//! Storage abstraction trait
//!
//! This module defines the Storage trait that every disk backend implements.

use crate::StorageDriver;
use async_trait::async_trait;
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

    #[error("Unknown disk: {0}")]
    UnknownDisk(String),

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
/// All disk backends (local filesystem, S3, in-memory) implement this trait so the
/// image pipeline can write to any of them without knowing which one it got.
///
/// **Path format:** `{location}/{filename}`, relative to the disk root. See the crate
/// root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` at `path`, replacing any existing object.
    ///
    /// Backends that keep object metadata store `content_type` with it.
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Read the object stored at `path`
    async fn get(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Delete the object at `path`.
    ///
    /// Returns `true` if an object was removed and `false` if there was nothing to remove.
    async fn delete(&self, path: &str) -> StorageResult<bool>;

    /// Check if an object exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Public URL for `path`. Does not check that the object exists.
    fn url(&self, path: &str) -> StorageResult<String>;

    /// Get the storage driver type
    fn backend_type(&self) -> StorageDriver;
}
