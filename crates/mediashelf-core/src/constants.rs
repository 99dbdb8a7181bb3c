//! Shared constants

/// Raster extensions eligible for variant generation (lowercase, with leading dot).
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".webp"];

/// Name prefixes the host application gives to its own derived images.
/// A file whose hash carries one of these is never planned again.
pub const DERIVATIVE_PREFIXES: &[&str] = &["thumbnail_", "large_", "medium_", "small_"];

/// Auxiliary format emitted alongside native variants.
pub const AUXILIARY_EXTENSION: &str = ".webp";
pub const AUXILIARY_MIME_TYPE: &str = "image/webp";

pub const MIN_QUALITY: u8 = 10;
pub const MAX_QUALITY: u8 = 100;
pub const DEFAULT_QUALITY: u8 = 80;

/// Sentinel meaning "no override" for prefixes, paths and the custom domain.
pub const DISABLED_SENTINEL: &str = "-";

/// Environment variable prefix read by [`crate::UploadConfig::from_env`].
pub const ENV_PREFIX: &str = "MEDIASHELF_";
