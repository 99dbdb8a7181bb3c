use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::fmt;
use std::io::Cursor;
use thiserror::Error;

/// Raster formats variants are derived from and encoded to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

/// Source images use the same set of formats.
pub type SourceFormat = OutputFormat;

impl OutputFormat {
    /// Format for a file extension (case-insensitive, leading dot optional).
    /// Anything outside the raster set yields `None`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            _ => None,
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// Canonical extension, with leading dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => ".jpg",
            OutputFormat::Png => ".png",
            OutputFormat::WebP => ".webp",
        }
    }

    pub fn to_image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::WebP => ImageFormat::WebP,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jpeg => write!(f, "jpeg"),
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::WebP => write!(f, "webp"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{format} encoding failed: {message}")]
pub struct EncodeError {
    pub format: OutputFormat,
    pub message: String,
}

/// Main compression service
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode an image in `format` at `quality` (10-100).
    ///
    /// PNG is lossless; quality only affects JPEG and WebP.
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Bytes, EncodeError> {
        let quality = quality.clamp(1, 100);
        let result = match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality),
            OutputFormat::Png => Self::compress_png(img),
            OutputFormat::WebP => Self::compress_webp(img, quality),
        };

        result.map_err(|message| EncodeError { format, message })
    }

    /// Compress to JPEG (no alpha channel)
    fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, String> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut buffer = Vec::with_capacity((width * height) as usize / 4);
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| e.to_string())?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to PNG
    fn compress_png(img: &DynamicImage) -> Result<Bytes, String> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        img.write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| e.to_string())?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to lossy WebP
    fn compress_webp(img: &DynamicImage, quality: u8) -> Result<Bytes, String> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err("cannot encode an empty image".to_string());
        }

        // Convert to RGBA for WebP encoding
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality as f32);

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}
