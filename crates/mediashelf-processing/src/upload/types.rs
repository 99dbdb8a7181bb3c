//! Types for the upload and delete pipelines.

use crate::upload::error::DeleteError;
use crate::variants::RenderError;
use bytes::Bytes;
use mediashelf_storage::StorageError;

/// A rendered object ready for submission
#[derive(Clone, Debug)]
pub struct DerivedAsset {
    pub key: String,
    pub data: Bytes,
    pub content_type: String,
}

/// Outcome of a successful upload
#[derive(Debug)]
pub struct UploadReport {
    pub primary_key: String,
    pub public_url: String,
    /// Keys of derived objects that were stored, in plan order
    pub variant_keys: Vec<String>,
    /// Variants that could not be rendered and were therefore not submitted
    pub render_failures: Vec<RenderError>,
}

impl UploadReport {
    /// All stored keys, derived objects first
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.variant_keys.clone();
        keys.push(self.primary_key.clone());
        keys
    }
}

/// Outcome of a delete. Every planned key appears in exactly one of the three lists.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub removed: Vec<String>,
    /// Keys the store reported as missing; counted as deleted
    pub already_absent: Vec<String>,
    pub failures: Vec<(String, StorageError)>,
}

impl DeleteReport {
    pub(crate) fn record(&mut self, key: String, result: Result<(), StorageError>) {
        match result {
            Ok(()) => self.removed.push(key),
            Err(e) if e.is_not_found() => self.already_absent.push(key),
            Err(e) => self.failures.push((key, e)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every key the delete attempted
    pub fn attempted(&self) -> Vec<&str> {
        self.removed
            .iter()
            .chain(self.already_absent.iter())
            .chain(self.failures.iter().map(|(key, _)| key))
            .map(String::as_str)
            .collect()
    }

    /// First real failure, if any
    pub fn into_result(self) -> Result<(), DeleteError> {
        match self.failures.into_iter().next() {
            Some((key, source)) => Err(DeleteError::Store { key, source }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_report_classifies_results() {
        let mut report = DeleteReport::default();
        report.record("a".to_string(), Ok(()));
        report.record("b".to_string(), Err(StorageError::NotFound("b".to_string())));
        report.record(
            "c".to_string(),
            Err(StorageError::BackendError("denied".to_string())),
        );

        assert_eq!(report.removed, vec!["a"]);
        assert_eq!(report.already_absent, vec!["b"]);
        assert_eq!(report.attempted(), vec!["a", "b", "c"]);
        assert!(!report.is_success());

        match report.into_result() {
            Err(DeleteError::Store { key, .. }) => assert_eq!(key, "c"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_keys_are_success() {
        let mut report = DeleteReport::default();
        report.record("a".to_string(), Err(StorageError::NotFound("a".to_string())));
        assert!(report.is_success());
        assert!(report.into_result().is_ok());
    }
}
