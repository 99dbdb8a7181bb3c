//! Produces the encoded renditions of one variant.

use crate::compression::{ImageCompressor, OutputFormat, SourceFormat};
use crate::image::{ImageResize, ImageTransformer};
use bytes::Bytes;
use image::DynamicImage;
use mediashelf_core::{UploadConfig, VariantSpec};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to decode source image: {0}")]
    Decode(String),

    #[error("failed to encode variant {variant} as {format}: {message}")]
    Encode {
        variant: String,
        format: OutputFormat,
        message: String,
    },

    #[error("render task for variant {variant} failed: {message}")]
    Task { variant: String, message: String },
}

/// One encoded rendition of a variant
#[derive(Debug, Clone)]
pub struct RenderedVariant {
    pub format: OutputFormat,
    pub data: Bytes,
}

/// Formats every variant of a `source` image is encoded to: the source format first,
/// then WebP when the auxiliary format is on and the source is not WebP already.
pub fn target_formats(source: SourceFormat, auxiliary: bool) -> Vec<OutputFormat> {
    let mut formats = vec![source];
    if auxiliary && source != OutputFormat::WebP {
        formats.push(OutputFormat::WebP);
    }
    formats
}

#[derive(Debug, Clone, Copy)]
pub struct VariantRenderer {
    quality: u8,
    auxiliary: bool,
}

impl VariantRenderer {
    pub fn new(quality: u8, auxiliary: bool) -> Self {
        Self { quality, auxiliary }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.quality, config.auxiliary_format_enabled)
    }

    /// Decode `data` and render `spec`. A file extension outside the raster set yields
    /// no renditions.
    pub fn render(
        &self,
        data: &[u8],
        extension: &str,
        spec: &VariantSpec,
    ) -> Result<Vec<RenderedVariant>, RenderError> {
        let Some(source) = SourceFormat::from_extension(extension) else {
            return Ok(Vec::new());
        };

        let img = ImageTransformer::decode(data, source)
            .map_err(|e| RenderError::Decode(e.to_string()))?;
        self.render_image(&img, source, spec)
    }

    /// Render `spec` from an already decoded image, one rendition per target format.
    pub fn render_image(
        &self,
        img: &DynamicImage,
        source: SourceFormat,
        spec: &VariantSpec,
    ) -> Result<Vec<RenderedVariant>, RenderError> {
        let resized = ImageResize::apply_resize(img, &spec.options);

        target_formats(source, self.auxiliary)
            .into_iter()
            .map(|format| {
                let data = ImageCompressor::compress(&resized, format, self.quality).map_err(
                    |e| RenderError::Encode {
                        variant: spec.name(),
                        format,
                        message: e.message,
                    },
                )?;
                Ok(RenderedVariant { format, data })
            })
            .collect()
    }

    /// Full-size WebP rendition of the original.
    pub fn render_original_auxiliary(&self, img: &DynamicImage) -> Result<Bytes, RenderError> {
        ImageCompressor::compress(img, OutputFormat::WebP, self.quality).map_err(|e| {
            RenderError::Encode {
                variant: "original".to_string(),
                format: OutputFormat::WebP,
                message: e.message,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};
    use mediashelf_core::models::VariantDimensions;
    use mediashelf_core::{ResizeOptions, VariantPreset};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([9, 99, 199, 255])));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn sized(width: u32, height: u32) -> VariantSpec {
        VariantSpec::dimensioned(VariantDimensions { width, height })
    }

    #[test]
    fn test_target_formats() {
        assert_eq!(target_formats(OutputFormat::Png, false), vec![OutputFormat::Png]);
        assert_eq!(
            target_formats(OutputFormat::Jpeg, true),
            vec![OutputFormat::Jpeg, OutputFormat::WebP]
        );
        assert_eq!(target_formats(OutputFormat::WebP, true), vec![OutputFormat::WebP]);
    }

    #[test]
    fn test_render_native_and_auxiliary() {
        let renderer = VariantRenderer::new(80, true);
        let out = renderer.render(&png(400, 400), ".png", &sized(150, 150)).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].format, OutputFormat::Png);
        assert_eq!(out[1].format, OutputFormat::WebP);

        for rendition in &out {
            let decoded = image::load_from_memory(&rendition.data).unwrap();
            assert_eq!(decoded.dimensions(), (150, 150));
        }
    }

    #[test]
    fn test_render_never_upscales_dimensioned() {
        let renderer = VariantRenderer::new(80, false);
        let out = renderer.render(&png(100, 60), ".png", &sized(300, 300)).unwrap();
        let decoded = image::load_from_memory(&out[0].data).unwrap();
        let (w, h) = decoded.dimensions();
        assert!(w <= 100 && h <= 60, "got {w}x{h}");
    }

    #[test]
    fn test_render_labeled_uses_preset_options() {
        let preset = VariantPreset {
            name: "wide".to_string(),
            options: ResizeOptions {
                width: Some(200),
                ..Default::default()
            },
        };
        let renderer = VariantRenderer::new(80, false);
        let out = renderer
            .render(&png(100, 50), ".png", &VariantSpec::labeled(&preset))
            .unwrap();
        let decoded = image::load_from_memory(&out[0].data).unwrap();
        assert_eq!(decoded.dimensions(), (200, 100));
    }

    #[test]
    fn test_unsupported_source_yields_nothing() {
        let renderer = VariantRenderer::new(80, true);
        let out = renderer.render(b"GIF89a", ".gif", &sized(10, 10)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_corrupt_source_is_decode_error() {
        let renderer = VariantRenderer::new(80, true);
        let err = renderer
            .render(b"definitely not a png", ".png", &sized(10, 10))
            .unwrap_err();
        assert!(matches!(err, RenderError::Decode(_)));
    }

    #[test]
    fn test_render_original_auxiliary() {
        let renderer = VariantRenderer::new(70, true);
        let img = image::load_from_memory(&png(30, 20)).unwrap();
        let data = renderer.render_original_auxiliary(&img).unwrap();
        let decoded = image::load_from_memory_with_format(&data, image::ImageFormat::WebP).unwrap();
        assert_eq!(decoded.dimensions(), (30, 20));
    }
}
