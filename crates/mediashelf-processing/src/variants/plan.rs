//! The complete set of objects a file maps to.
//!
//! Upload writes exactly these keys and delete removes exactly these keys; neither
//! orchestrator builds a key anywhere else.

use crate::compression::{OutputFormat, SourceFormat};
use crate::variants::planner::VariantPlanner;
use crate::variants::renderer::target_formats;
use mediashelf_core::constants::{AUXILIARY_EXTENSION, AUXILIARY_MIME_TYPE};
use mediashelf_core::{AddressingConvention, FileAsset, UploadConfig, VariantSpec};
use mediashelf_storage::{build_key, KeyName};

/// One object to write or remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedObject {
    pub key: String,
    pub content_type: String,
    /// Encoding of a derived object; `None` for the primary, which is stored as received
    pub format: Option<OutputFormat>,
}

/// A variant and the objects its renditions land in, in `target_formats` order
#[derive(Debug, Clone)]
pub struct PlannedVariant {
    pub spec: VariantSpec,
    pub targets: Vec<PlannedObject>,
}

#[derive(Debug, Clone)]
pub struct ObjectPlan {
    pub primary: PlannedObject,
    pub variants: Vec<PlannedVariant>,
    pub original_auxiliary: Option<PlannedObject>,
}

impl ObjectPlan {
    pub fn for_file(planner: &VariantPlanner, config: &UploadConfig, file: &FileAsset) -> Self {
        let prefix = config.key_prefix.as_str();
        let path = file.path.as_deref();
        let source = SourceFormat::from_extension(&file.extension);

        let primary = PlannedObject {
            key: build_key(prefix, path, &file.hash, KeyName::Original, &file.extension),
            content_type: file.mime_type.clone(),
            format: None,
        };

        let variants = match source {
            Some(source) => planner
                .plan(file)
                .into_iter()
                .map(|spec| {
                    let variant_name = spec.name();
                    let targets = target_formats(source, config.auxiliary_format_enabled)
                        .into_iter()
                        .map(|format| {
                            let (extension, content_type) = if format == source {
                                (file.extension.as_str(), file.mime_type.as_str())
                            } else {
                                (format.extension(), format.to_mime_type())
                            };
                            let name = match spec.convention() {
                                AddressingConvention::Labeled => KeyName::Labeled(&variant_name),
                                AddressingConvention::Dimensioned => {
                                    KeyName::Dimensioned(&variant_name)
                                }
                            };
                            PlannedObject {
                                key: build_key(prefix, path, &file.hash, name, extension),
                                content_type: content_type.to_string(),
                                format: Some(format),
                            }
                        })
                        .collect();
                    PlannedVariant { spec, targets }
                })
                .collect(),
            None => Vec::new(),
        };

        let original_auxiliary = match source {
            Some(source)
                if config.auxiliary_format_enabled
                    && config.auxiliary_original
                    && source != OutputFormat::WebP
                    && planner.is_eligible(file) =>
            {
                Some(PlannedObject {
                    key: build_key(
                        prefix,
                        path,
                        &file.hash,
                        KeyName::Original,
                        AUXILIARY_EXTENSION,
                    ),
                    content_type: AUXILIARY_MIME_TYPE.to_string(),
                    format: Some(OutputFormat::WebP),
                })
            }
            _ => None,
        };

        Self {
            primary,
            variants,
            original_auxiliary,
        }
    }

    /// Whether any object besides the primary is planned
    pub fn has_derived(&self) -> bool {
        !self.variants.is_empty() || self.original_auxiliary.is_some()
    }

    /// Derived objects in plan order: variant renditions, then the auxiliary original.
    pub fn derived(&self) -> impl Iterator<Item = &PlannedObject> {
        self.variants
            .iter()
            .flat_map(|variant| variant.targets.iter())
            .chain(self.original_auxiliary.iter())
    }

    /// Every key of the file, derived objects first and the primary last.
    pub fn keys(&self) -> Vec<String> {
        self.derived()
            .chain(std::iter::once(&self.primary))
            .map(|object| object.key.clone())
            .collect()
    }
}
