//! Upload pipeline: plan, render, submit, publish.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use image::DynamicImage;
use mediashelf_core::{ConfigError, FileAsset, UploadConfig};
use mediashelf_storage::{public_url, Storage, StorageError};

use crate::compression::SourceFormat;
use crate::image::ImageTransformer;
use crate::upload::error::UploadError;
use crate::upload::types::{DerivedAsset, UploadReport};
use crate::variants::{
    ObjectPlan, PlannedObject, PlannedVariant, RenderError, RenderedVariant, VariantPlanner,
    VariantRenderer,
};

/// Uploads a file and its derived objects through a storage backend
pub struct UploadOrchestrator {
    storage: Arc<dyn Storage>,
    config: Arc<UploadConfig>,
    planner: VariantPlanner,
    renderer: VariantRenderer,
}

impl UploadOrchestrator {
    pub fn new(storage: Arc<dyn Storage>, config: Arc<UploadConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        let planner = VariantPlanner::new(&config)?;
        let renderer = VariantRenderer::from_config(&config);
        Ok(Self {
            storage,
            config,
            planner,
            renderer,
        })
    }

    /// Key plan for `file` under this orchestrator's configuration
    pub fn plan(&self, file: &FileAsset) -> ObjectPlan {
        ObjectPlan::for_file(&self.planner, &self.config, file)
    }

    /// Store `file` and its derived objects, then set `file.public_url`.
    ///
    /// The primary object is submitted concurrently with the derived ones. A failed
    /// primary submission fails the upload without touching `public_url`; otherwise the
    /// URL is set and the first failed derived submission, in plan order, is returned.
    /// Objects already stored are left in place.
    pub async fn upload(&self, file: &mut FileAsset) -> Result<UploadReport, UploadError> {
        let start = Instant::now();
        let plan = self.plan(file);

        let (derived, mut render_failures) = if plan.has_derived() {
            self.render(&plan, file).await
        } else {
            (Vec::new(), Vec::new())
        };

        for failure in &render_failures {
            tracing::warn!(hash = %file.hash, error = %failure, "Variant render failed");
        }
        if self.config.fail_on_render_error && !render_failures.is_empty() {
            return Err(UploadError::Render(render_failures.remove(0)));
        }

        let public = self.config.public_acl;
        let limit = self
            .config
            .max_concurrent_submissions
            .unwrap_or(derived.len())
            .max(1);

        let variant_submissions = stream::iter(derived)
            .map(|asset| {
                let storage = Arc::clone(&self.storage);
                async move {
                    let result = storage
                        .put_object(&asset.key, asset.data, &asset.content_type, public)
                        .await;
                    (asset.key, result)
                }
            })
            .buffered(limit)
            .collect::<Vec<(String, Result<String, StorageError>)>>();

        let primary_submission = self.storage.put_object(
            &plan.primary.key,
            file.data.clone(),
            &file.mime_type,
            public,
        );

        let (variant_results, primary_result) =
            tokio::join!(variant_submissions, primary_submission);

        let location = primary_result.map_err(|source| {
            tracing::error!(key = %plan.primary.key, error = %source, "Primary upload failed");
            UploadError::Store {
                key: plan.primary.key.clone(),
                source,
            }
        })?;

        let url = public_url(self.config.custom_domain(), &location, &plan.primary.key);
        file.public_url = Some(url.clone());

        let mut variant_keys = Vec::with_capacity(variant_results.len());
        let mut first_failure = None;
        for (key, result) in variant_results {
            match result {
                Ok(_) => variant_keys.push(key),
                Err(source) => {
                    tracing::error!(key = %key, error = %source, "Variant upload failed");
                    if first_failure.is_none() {
                        first_failure = Some(UploadError::Store { key, source });
                    }
                }
            }
        }
        if let Some(err) = first_failure {
            return Err(err);
        }

        tracing::info!(
            key = %plan.primary.key,
            url = %url,
            variants = variant_keys.len(),
            render_failures = render_failures.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Uploaded file"
        );

        Ok(UploadReport {
            primary_key: plan.primary.key,
            public_url: url,
            variant_keys,
            render_failures,
        })
    }

    /// Decode once, then render every planned variant on the blocking pool.
    async fn render(
        &self,
        plan: &ObjectPlan,
        file: &FileAsset,
    ) -> (Vec<DerivedAsset>, Vec<RenderError>) {
        let Some(source) = SourceFormat::from_extension(&file.extension) else {
            return (Vec::new(), Vec::new());
        };

        let data = file.data.clone();
        let decoded = tokio::task::spawn_blocking(move || ImageTransformer::decode(&data, source))
            .await
            .map_err(|e| RenderError::Task {
                variant: "original".to_string(),
                message: e.to_string(),
            })
            .and_then(|result| result.map_err(|e| RenderError::Decode(e.to_string())));

        let img = match decoded {
            Ok(img) => Arc::new(img),
            Err(e) => return (Vec::new(), vec![e]),
        };

        let tasks = plan.variants.iter().map(|variant| {
            let img = Arc::clone(&img);
            let renderer = self.renderer;
            let spec = variant.spec.clone();
            async move {
                let name = spec.name();
                tokio::task::spawn_blocking(move || renderer.render_image(&img, source, &spec))
                    .await
                    .unwrap_or_else(|e| {
                        Err(RenderError::Task {
                            variant: name,
                            message: e.to_string(),
                        })
                    })
            }
        });
        let rendered = futures::future::join_all(tasks).await;

        let mut derived = Vec::new();
        let mut failures = Vec::new();
        for (variant, result) in plan.variants.iter().zip(rendered) {
            match result {
                Ok(renditions) => derived.extend(Self::attach_keys(variant, renditions)),
                Err(e) => failures.push(e),
            }
        }

        if let Some(target) = &plan.original_auxiliary {
            match self.render_original_auxiliary(Arc::clone(&img)).await {
                Ok(data) => derived.push(DerivedAsset {
                    key: target.key.clone(),
                    data,
                    content_type: target.content_type.clone(),
                }),
                Err(e) => failures.push(e),
            }
        }

        (derived, failures)
    }

    async fn render_original_auxiliary(
        &self,
        img: Arc<DynamicImage>,
    ) -> Result<bytes::Bytes, RenderError> {
        let renderer = self.renderer;
        tokio::task::spawn_blocking(move || renderer.render_original_auxiliary(&img))
            .await
            .unwrap_or_else(|e| {
                Err(RenderError::Task {
                    variant: "original".to_string(),
                    message: e.to_string(),
                })
            })
    }

    /// Pair renditions with the planned objects of the same format.
    fn attach_keys(variant: &PlannedVariant, renditions: Vec<RenderedVariant>) -> Vec<DerivedAsset> {
        renditions
            .into_iter()
            .filter_map(|rendition| {
                let target: &PlannedObject = variant
                    .targets
                    .iter()
                    .find(|target| target.format == Some(rendition.format))?;
                Some(DerivedAsset {
                    key: target.key.clone(),
                    data: rendition.data,
                    content_type: target.content_type.clone(),
                })
            })
            .collect()
    }
}
