//! Configuration module
//!
//! `UploadConfig` is the validated, immutable snapshot both orchestrators share.
//! It is loaded from `MEDIASHELF_*` environment variables (after `.env`), or built
//! directly and checked with [`UploadConfig::validate`].

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use crate::constants::{DEFAULT_QUALITY, DISABLED_SENTINEL, ENV_PREFIX, MAX_QUALITY, MIN_QUALITY};
use crate::error::{ConfigError, ConfigResult};
use crate::models::{AddressingConvention, VariantDimensions, VariantPreset};
use crate::storage_types::StorageBackend;

/// Static credentials for the object store. Omit to use ambient credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Store connection settings. Opaque to the variant logic.
#[derive(Clone, Debug, Default)]
pub struct StoreSettings {
    pub backend: StorageBackend,
    pub region: Option<String>,
    pub bucket: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub endpoint: Option<String>,
    pub credentials: Option<Credentials>,
    pub local_path: Option<String>,
    pub local_base_url: Option<String>,
}

/// Where variant definitions come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VariantSource {
    /// Named presets, addressed as `{name}_{hash}{ext}`
    Presets(Vec<VariantPreset>),
    /// `WxH` sizes, addressed as `{hash}-{W}x{H}{ext}`
    Dimensions(Vec<VariantDimensions>),
}

impl VariantSource {
    /// Parse newline-delimited `WxH` text. Blank lines are skipped; any other
    /// malformed line rejects the whole source.
    pub fn parse_dimensions(text: &str) -> ConfigResult<Self> {
        let dimensions = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(VariantDimensions::parse)
            .collect::<ConfigResult<Vec<_>>>()?;
        let source = VariantSource::Dimensions(dimensions);
        source.validate()?;
        Ok(source)
    }

    /// Parse a JSON list of `{"name": .., "options": {..}}` presets.
    pub fn parse_presets(json: &str) -> ConfigResult<Self> {
        let presets: Vec<VariantPreset> = serde_json::from_str(json)?;
        let source = VariantSource::Presets(presets);
        source.validate()?;
        Ok(source)
    }

    pub fn convention(&self) -> AddressingConvention {
        match self {
            VariantSource::Presets(_) => AddressingConvention::Labeled,
            VariantSource::Dimensions(_) => AddressingConvention::Dimensioned,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            VariantSource::Presets(presets) => presets.is_empty(),
            VariantSource::Dimensions(dimensions) => dimensions.is_empty(),
        }
    }

    /// Preset names; empty for size-only sources.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            VariantSource::Presets(presets) => presets.iter().map(|p| p.name.as_str()).collect(),
            VariantSource::Dimensions(_) => Vec::new(),
        }
    }

    /// Two entries with the same name would write to the same key.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        match self {
            VariantSource::Presets(presets) => {
                for preset in presets {
                    let name = preset.name.trim();
                    if name.is_empty() || name.contains('/') {
                        return Err(ConfigError::InvalidVariant {
                            line: preset.name.clone(),
                            reason: "preset name must be non-empty and contain no '/'".to_string(),
                        });
                    }
                    if !seen.insert(name.to_string()) {
                        return Err(ConfigError::InvalidVariant {
                            line: preset.name.clone(),
                            reason: "duplicate preset name".to_string(),
                        });
                    }
                }
            }
            VariantSource::Dimensions(dimensions) => {
                for dims in dimensions {
                    if dims.width == 0 || dims.height == 0 {
                        return Err(ConfigError::InvalidVariant {
                            line: dims.suffix(),
                            reason: "dimensions must be greater than zero".to_string(),
                        });
                    }
                    if !seen.insert(dims.suffix()) {
                        return Err(ConfigError::InvalidVariant {
                            line: dims.suffix(),
                            reason: "duplicate size".to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Upload/delete configuration snapshot
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub store: StoreSettings,
    pub key_prefix: String,
    /// Public domain used instead of the store location (`-` or empty disables it)
    pub custom_domain: Option<String>,
    pub public_acl: bool,
    pub variants: Option<VariantSource>,
    pub variants_enabled: bool,
    /// Also emit a WebP rendition of every variant
    pub auxiliary_format_enabled: bool,
    /// Also emit a full-size WebP rendition of the original (`{hash}.webp`)
    pub auxiliary_original: bool,
    /// Re-encode quality, 10-100
    pub quality: u8,
    /// Bound on concurrent store submissions per call; `None` is unbounded
    pub max_concurrent_submissions: Option<usize>,
    /// Abort the upload when any variant fails to render
    pub fail_on_render_error: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            store: StoreSettings::default(),
            key_prefix: String::new(),
            custom_domain: None,
            public_acl: false,
            variants: None,
            variants_enabled: true,
            auxiliary_format_enabled: false,
            auxiliary_original: false,
            quality: DEFAULT_QUALITY,
            max_concurrent_submissions: None,
            fail_on_render_error: false,
        }
    }
}

/// Raw `MEDIASHELF_*` variables, before validation
#[derive(Debug, Default, Deserialize)]
struct EnvSettings {
    storage_backend: Option<String>,
    s3_region: Option<String>,
    s3_bucket: Option<String>,
    s3_endpoint: Option<String>,
    s3_access_key_id: Option<String>,
    s3_secret_access_key: Option<String>,
    key_prefix: Option<String>,
    custom_domain: Option<String>,
    public_acl: Option<bool>,
    variants: Option<String>,
    variant_presets: Option<String>,
    variants_enabled: Option<bool>,
    auxiliary_format_enabled: Option<bool>,
    auxiliary_original: Option<bool>,
    image_quality: Option<i64>,
    max_concurrent_submissions: Option<usize>,
    fail_on_render_error: Option<bool>,
    local_storage_path: Option<String>,
    local_storage_base_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl UploadConfig {
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build from an explicit set of variables (same names as the environment).
    pub fn from_vars<I>(vars: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        let aws_region = vars
            .iter()
            .find(|(key, _)| key == "AWS_REGION")
            .map(|(_, value)| value.clone());

        let settings: EnvSettings = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        let config = Self::from_settings(settings, aws_region)?;
        config.validate()?;
        Ok(config)
    }

    fn from_settings(settings: EnvSettings, aws_region: Option<String>) -> ConfigResult<Self> {
        let backend = match non_empty(settings.storage_backend) {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let credentials = match (
            non_empty(settings.s3_access_key_id),
            non_empty(settings.s3_secret_access_key),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(Credentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "S3_ACCESS_KEY_ID",
                    message: "access key id and secret access key must be set together"
                        .to_string(),
                })
            }
        };

        let variants = match (
            non_empty(settings.variants),
            non_empty(settings.variant_presets),
        ) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid {
                    key: "VARIANTS",
                    message: "VARIANTS and VARIANT_PRESETS are mutually exclusive".to_string(),
                })
            }
            (Some(text), None) => Some(VariantSource::parse_dimensions(&text)?),
            (None, Some(json)) => Some(VariantSource::parse_presets(&json)?),
            (None, None) => None,
        };

        let quality = settings.image_quality.unwrap_or(DEFAULT_QUALITY as i64);
        if quality < MIN_QUALITY as i64 || quality > MAX_QUALITY as i64 {
            return Err(ConfigError::QualityOutOfRange(quality));
        }

        Ok(UploadConfig {
            store: StoreSettings {
                backend,
                region: non_empty(settings.s3_region).or_else(|| non_empty(aws_region)),
                bucket: non_empty(settings.s3_bucket),
                endpoint: non_empty(settings.s3_endpoint),
                credentials,
                local_path: non_empty(settings.local_storage_path),
                local_base_url: non_empty(settings.local_storage_base_url),
            },
            key_prefix: settings.key_prefix.unwrap_or_default().trim().to_string(),
            custom_domain: non_empty(settings.custom_domain)
                .filter(|domain| domain != DISABLED_SENTINEL),
            public_acl: settings.public_acl.unwrap_or(false),
            variants,
            variants_enabled: settings.variants_enabled.unwrap_or(true),
            auxiliary_format_enabled: settings.auxiliary_format_enabled.unwrap_or(false),
            auxiliary_original: settings.auxiliary_original.unwrap_or(false),
            quality: quality as u8,
            max_concurrent_submissions: settings.max_concurrent_submissions,
            fail_on_render_error: settings.fail_on_render_error.unwrap_or(false),
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(ConfigError::QualityOutOfRange(self.quality as i64));
        }

        if self.max_concurrent_submissions == Some(0) {
            return Err(ConfigError::Invalid {
                key: "MAX_CONCURRENT_SUBMISSIONS",
                message: "must be at least 1".to_string(),
            });
        }

        if let Some(source) = &self.variants {
            source.validate()?;
        }

        match self.store.backend {
            StorageBackend::S3 => {
                if self.store.bucket.is_none() {
                    return Err(ConfigError::Missing("MEDIASHELF_S3_BUCKET"));
                }
            }
            StorageBackend::Local => {
                if self.store.local_path.is_none() {
                    return Err(ConfigError::Missing("MEDIASHELF_LOCAL_STORAGE_PATH"));
                }
                if self.store.local_base_url.is_none() {
                    return Err(ConfigError::Missing("MEDIASHELF_LOCAL_STORAGE_BASE_URL"));
                }
            }
            StorageBackend::Memory => {}
        }

        Ok(())
    }

    /// Whether variants are generated at all (per-file guards still apply).
    pub fn variant_generation_enabled(&self) -> bool {
        self.variants_enabled
            && self
                .variants
                .as_ref()
                .is_some_and(|source| !source.is_empty())
    }

    /// Custom public domain, with the `-` sentinel and blanks treated as unset.
    pub fn custom_domain(&self) -> Option<&str> {
        self.custom_domain
            .as_deref()
            .map(str::trim)
            .filter(|domain| !domain.is_empty() && *domain != DISABLED_SENTINEL)
    }
}
