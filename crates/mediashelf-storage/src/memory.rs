//! In-memory storage, used for dry runs and tests.

use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// An object as the store received it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
    pub public: bool,
}

#[derive(Default)]
struct Inner {
    objects: HashMap<String, StoredObject>,
    put_log: Vec<String>,
    remove_log: Vec<String>,
    failing_keys: HashSet<String>,
}

/// Storage that keeps objects in a map. Clones share the same map.
#[derive(Clone)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
    base_url: String,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_base_url("memory://mediashelf")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            base_url: base_url.into(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned map is still consistent: every mutation is a single insert/remove
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every put/remove of `key` fail with a backend error.
    pub fn fail_on(&self, key: impl Into<String>) {
        self.lock().failing_keys.insert(key.into());
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.lock().objects.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().objects.contains_key(key)
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().objects.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Every key passed to `put_object`, in call order, including failed calls.
    pub fn put_log(&self) -> Vec<String> {
        self.lock().put_log.clone()
    }

    /// Every key passed to `remove_object`, in call order, including failed calls.
    pub fn remove_log(&self) -> Vec<String> {
        self.lock().remove_log.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().objects.is_empty()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        public: bool,
    ) -> StorageResult<String> {
        let mut inner = self.lock();
        inner.put_log.push(key.to_string());
        if inner.failing_keys.contains(key) {
            return Err(StorageError::BackendError(format!(
                "injected failure for {}",
                key
            )));
        }
        inner.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                public,
            },
        );
        tracing::debug!(key = %key, "Memory upload successful");
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }

    async fn remove_object(&self, key: &str) -> StorageResult<()> {
        let mut inner = self.lock();
        inner.remove_log.push(key.to_string());
        if inner.failing_keys.contains(key) {
            return Err(StorageError::BackendError(format!(
                "injected failure for {}",
                key
            )));
        }
        inner
            .objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
