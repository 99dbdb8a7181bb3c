//! File asset model: the host application's view of one uploaded file.

use bytes::Bytes;

use crate::constants::IMAGE_EXTENSIONS;

/// A file handed over by the host application for one upload or delete call.
///
/// `public_url` is the only field written back, once the primary object is stored.
#[derive(Debug, Clone)]
pub struct FileAsset {
    /// Content-derived identifier, unique per logical upload.
    pub hash: String,
    /// Lowercased, with leading dot (e.g. `.png`).
    pub extension: String,
    pub mime_type: String,
    /// Logical folder inside the bucket.
    pub path: Option<String>,
    pub data: Bytes,
    pub public_url: Option<String>,
}

impl FileAsset {
    pub fn new(
        hash: impl Into<String>,
        extension: &str,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            hash: hash.into(),
            extension: normalize_extension(extension),
            mime_type: mime_type.into(),
            path: None,
            data: data.into(),
            public_url: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Whether the extension is one of the raster types variants can be derived from.
    pub fn is_raster_image(&self) -> bool {
        IMAGE_EXTENSIONS.contains(&self.extension.to_lowercase().as_str())
    }
}

/// Lowercase an extension and make sure it carries its leading dot.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().to_lowercase();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_normalized() {
        let file = FileAsset::new("abc", "PNG", "image/png", Vec::new());
        assert_eq!(file.extension, ".png");

        let file = FileAsset::new("abc", ".JPeg", "image/jpeg", Vec::new());
        assert_eq!(file.extension, ".jpeg");

        assert_eq!(normalize_extension(""), "");
    }

    #[test]
    fn test_is_raster_image() {
        assert!(FileAsset::new("a", ".webp", "image/webp", Vec::new()).is_raster_image());
        assert!(FileAsset::new("a", ".JPG", "image/jpeg", Vec::new()).is_raster_image());
        assert!(!FileAsset::new("a", ".gif", "image/gif", Vec::new()).is_raster_image());
        assert!(!FileAsset::new("a", ".pdf", "application/pdf", Vec::new()).is_raster_image());
    }

    #[test]
    fn test_with_path() {
        let file = FileAsset::new("a", ".png", "image/png", Vec::new()).with_path("avatars");
        assert_eq!(file.path.as_deref(), Some("avatars"));
        assert!(file.public_url.is_none());
    }
}
