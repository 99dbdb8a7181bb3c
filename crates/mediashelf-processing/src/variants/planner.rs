//! Turns variant configuration into the per-file list of variants to derive.

use crate::variants::guard::DerivativeGuard;
use mediashelf_core::{ConfigError, ConfigResult, FileAsset, UploadConfig, VariantSource, VariantSpec};

/// Plans variants for files under one configuration
#[derive(Debug, Clone)]
pub struct VariantPlanner {
    specs: Vec<VariantSpec>,
    guard: Option<DerivativeGuard>,
    enabled: bool,
}

impl VariantPlanner {
    pub fn new(config: &UploadConfig) -> ConfigResult<Self> {
        let (specs, guard) = match &config.variants {
            Some(source) => {
                source.validate()?;
                let guard = DerivativeGuard::new(source).map_err(|e| ConfigError::Invalid {
                    key: "VARIANTS",
                    message: format!("cannot build derivative pattern: {}", e),
                })?;
                (Self::specs(source), Some(guard))
            }
            None => (Vec::new(), None),
        };

        Ok(Self {
            specs,
            guard,
            enabled: config.variant_generation_enabled(),
        })
    }

    /// Variant specs for a source, in configuration order.
    ///
    /// Presets are used verbatim; sizes become cover-fit, non-enlarging specs.
    pub fn specs(source: &VariantSource) -> Vec<VariantSpec> {
        match source {
            VariantSource::Presets(presets) => presets.iter().map(VariantSpec::labeled).collect(),
            VariantSource::Dimensions(dimensions) => dimensions
                .iter()
                .copied()
                .map(VariantSpec::dimensioned)
                .collect(),
        }
    }

    /// Whether `file` could get derived objects at all: a raster image that is not
    /// itself a derivative.
    pub fn is_eligible(&self, file: &FileAsset) -> bool {
        file.is_raster_image() && !self.is_derivative(file)
    }

    pub fn is_derivative(&self, file: &FileAsset) -> bool {
        self.guard
            .as_ref()
            .is_some_and(|guard| guard.is_derivative(&file.hash))
    }

    /// Variants to derive for `file`. Empty when generation is disabled, the file is
    /// not a supported raster image, or the file is a derivative.
    pub fn plan(&self, file: &FileAsset) -> Vec<VariantSpec> {
        if !self.enabled || !self.is_eligible(file) {
            return Vec::new();
        }
        self.specs.clone()
    }
}
