//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
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

impl StorageError {
    /// A missing object; removal treats this as "already deleted".
    pub fn is_not_found(&self) -> bool {
        match self {
            StorageError::NotFound(_) => true,
            StorageError::IoError(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Both operations are idempotent at the key level: putting the same key twice
/// overwrites it, removing an absent key either succeeds or reports `NotFound`.
/// Retry policy, if any, belongs to the backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` and return the object's location URL.
    ///
    /// `content_type` is set on the object verbatim; `public` requests a
    /// public-read ACL where the backend supports one.
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        public: bool,
    ) -> StorageResult<String>;

    /// Remove the object stored under `key`.
    async fn remove_object(&self, key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(StorageError::NotFound("a".to_string()).is_not_found());
        assert!(StorageError::IoError(std::io::Error::from(std::io::ErrorKind::NotFound))
            .is_not_found());
        assert!(!StorageError::DeleteFailed("denied".to_string()).is_not_found());
        assert!(!StorageError::IoError(std::io::Error::from(
            std::io::ErrorKind::PermissionDenied
        ))
        .is_not_found());
    }
}
