//! Delete pipeline: remove every object an upload of the same file would have written.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use mediashelf_core::{ConfigError, FileAsset, UploadConfig};
use mediashelf_storage::Storage;

use crate::upload::types::DeleteReport;
use crate::variants::{ObjectPlan, VariantPlanner};

pub struct DeleteOrchestrator {
    storage: Arc<dyn Storage>,
    config: Arc<UploadConfig>,
    planner: VariantPlanner,
}

impl DeleteOrchestrator {
    pub fn new(storage: Arc<dyn Storage>, config: Arc<UploadConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        let planner = VariantPlanner::new(&config)?;
        Ok(Self {
            storage,
            config,
            planner,
        })
    }

    pub fn plan(&self, file: &FileAsset) -> ObjectPlan {
        ObjectPlan::for_file(&self.planner, &self.config, file)
    }

    /// Remove the derived objects of `file` concurrently, then the primary.
    ///
    /// Every key is attempted; missing keys count as removed.
    pub async fn delete(&self, file: &FileAsset) -> DeleteReport {
        let start = Instant::now();
        let plan = self.plan(file);
        let mut report = DeleteReport::default();

        let derived_keys: Vec<String> = plan.derived().map(|object| object.key.clone()).collect();
        let limit = self
            .config
            .max_concurrent_submissions
            .unwrap_or(derived_keys.len())
            .max(1);

        let results = stream::iter(derived_keys)
            .map(|key| {
                let storage = Arc::clone(&self.storage);
                async move {
                    let result = storage.remove_object(&key).await;
                    (key, result)
                }
            })
            .buffered(limit)
            .collect::<Vec<_>>()
            .await;

        for (key, result) in results {
            if let Err(e) = &result {
                if !e.is_not_found() {
                    tracing::error!(key = %key, error = %e, "Variant delete failed");
                }
            }
            report.record(key, result);
        }

        let primary_result = self.storage.remove_object(&plan.primary.key).await;
        if let Err(e) = &primary_result {
            if !e.is_not_found() {
                tracing::error!(key = %plan.primary.key, error = %e, "Primary delete failed");
            }
        }
        report.record(plan.primary.key, primary_result);

        tracing::info!(
            hash = %file.hash,
            removed = report.removed.len(),
            already_absent = report.already_absent.len(),
            failed = report.failures.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Deleted file"
        );

        report
    }
}
