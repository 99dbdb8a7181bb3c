use crate::variants::RenderError;
use mediashelf_core::ConfigError;
use mediashelf_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid upload configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to store {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl UploadError {
    /// Key of the object whose submission failed
    pub fn key(&self) -> Option<&str> {
        match self {
            UploadError::Store { key, .. } => Some(key),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("failed to remove {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: StorageError,
    },
}
