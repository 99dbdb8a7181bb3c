//! Variant descriptors: what to derive from an original image and how it is addressed.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// How a resized image is fitted into the requested box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Fill the box, cropping the overflow (centered)
    #[default]
    Cover,
    /// Fit inside the box and pad the remainder
    Contain,
    /// Stretch to the exact box, ignoring aspect ratio
    Fill,
    /// Fit inside the box, no padding
    Inside,
    /// Cover the box, no cropping
    Outside,
}

/// Resize options attached to a variant.
///
/// Structured presets carry these as free-form JSON; unknown keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: FitMode,
    #[serde(alias = "without_enlargement")]
    pub without_enlargement: bool,
}

/// Which key layout a deployment uses for its variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingConvention {
    /// `{label}_{hash}{ext}`
    Labeled,
    /// `{hash}-{width}x{height}{ext}`
    Dimensioned,
}

/// One `WxH` entry of a delimited variant list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantDimensions {
    pub width: u32,
    pub height: u32,
}

impl VariantDimensions {
    /// Parse a `WxH` line. Both sides are required and must be positive integers.
    pub fn parse(line: &str) -> ConfigResult<Self> {
        let line = line.trim();
        let invalid = |reason: &str| ConfigError::InvalidVariant {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let (width, height) = line
            .split_once('x')
            .ok_or_else(|| invalid("expected WxH"))?;

        let width = width
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid("width is not a positive integer"))?;
        let height = height
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid("height is not a positive integer"))?;

        if width == 0 || height == 0 {
            return Err(invalid("dimensions must be greater than zero"));
        }

        Ok(Self { width, height })
    }

    /// Key suffix, e.g. `150x150`
    pub fn suffix(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// A named preset from structured configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPreset {
    pub name: String,
    #[serde(default)]
    pub options: ResizeOptions,
}

/// A normalized variant descriptor, derived once per call from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    /// Set for labeled variants, `None` for size-only ones
    pub label: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub options: ResizeOptions,
}

impl VariantSpec {
    /// Labeled variant; the preset's options are used verbatim.
    pub fn labeled(preset: &VariantPreset) -> Self {
        Self {
            label: Some(preset.name.clone()),
            width: preset.options.width,
            height: preset.options.height,
            options: preset.options,
        }
    }

    /// Size-only variant: cover the box, never enlarge.
    pub fn dimensioned(dimensions: VariantDimensions) -> Self {
        Self {
            label: None,
            width: Some(dimensions.width),
            height: Some(dimensions.height),
            options: ResizeOptions {
                width: Some(dimensions.width),
                height: Some(dimensions.height),
                fit: FitMode::Cover,
                without_enlargement: true,
            },
        }
    }

    pub fn convention(&self) -> AddressingConvention {
        if self.label.is_some() {
            AddressingConvention::Labeled
        } else {
            AddressingConvention::Dimensioned
        }
    }

    /// The label, or the `WxH` suffix for size-only variants.
    pub fn name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!(
                "{}x{}",
                self.width.unwrap_or_default(),
                self.height.unwrap_or_default()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        let dims = VariantDimensions::parse("320x240").unwrap();
        assert_eq!(dims.width, 320);
        assert_eq!(dims.height, 240);

        let dims = VariantDimensions::parse("  150 x 150 ").unwrap();
        assert_eq!(dims.suffix(), "150x150");
    }

    #[test]
    fn test_parse_dimensions_rejects_malformed() {
        for line in ["abcxdef", "150", "x240", "320x", "0x100", "100x0", "-5x10", "1.5x2"] {
            let err = VariantDimensions::parse(line).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidVariant { .. }),
                "{line} should be rejected"
            );
        }
    }

    #[test]
    fn test_resize_options_from_json() {
        let options: ResizeOptions = serde_json::from_str(
            r#"{"width": 245, "height": 156, "fit": "inside", "withoutEnlargement": true, "position": "top"}"#,
        )
        .unwrap();
        assert_eq!(options.width, Some(245));
        assert_eq!(options.height, Some(156));
        assert_eq!(options.fit, FitMode::Inside);
        assert!(options.without_enlargement);

        let options: ResizeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ResizeOptions::default());
        assert_eq!(options.fit, FitMode::Cover);
    }

    #[test]
    fn test_spec_names_and_conventions() {
        let preset = VariantPreset {
            name: "thumbnail".to_string(),
            options: ResizeOptions {
                width: Some(245),
                ..Default::default()
            },
        };
        let labeled = VariantSpec::labeled(&preset);
        assert_eq!(labeled.convention(), AddressingConvention::Labeled);
        assert_eq!(labeled.name(), "thumbnail");
        assert_eq!(labeled.width, Some(245));
        assert_eq!(labeled.height, None);

        let sized = VariantSpec::dimensioned(VariantDimensions {
            width: 300,
            height: 200,
        });
        assert_eq!(sized.convention(), AddressingConvention::Dimensioned);
        assert_eq!(sized.name(), "300x200");
        assert!(sized.options.without_enlargement);
        assert_eq!(sized.options.fit, FitMode::Cover);
    }
}
