#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{MemoryStorage, Storage, StorageBackend, StorageError, StorageResult};
use mediashelf_core::StoreSettings;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(settings: &StoreSettings) -> StorageResult<Arc<dyn Storage>> {
    match settings.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let storage = S3Storage::from_settings(settings).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = settings.local_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = settings.local_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_storage() {
        let settings = StoreSettings {
            backend: StorageBackend::Memory,
            ..Default::default()
        };
        let storage = create_storage(&settings).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Memory);
    }

    #[cfg(feature = "storage-local")]
    #[tokio::test]
    async fn test_create_local_storage_requires_paths() {
        let settings = StoreSettings {
            backend: StorageBackend::Local,
            ..Default::default()
        };
        let result = create_storage(&settings).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));

        let dir = tempfile::TempDir::new().unwrap();
        let settings = StoreSettings {
            backend: StorageBackend::Local,
            local_path: Some(dir.path().display().to_string()),
            local_base_url: Some("http://localhost/media".to_string()),
            ..Default::default()
        };
        let storage = create_storage(&settings).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }
}
