use std::path::Path;

use sha2::{Digest, Sha256};

/// Default file hash: the first 10 hex digits of the content's SHA-256 followed by
/// the file stem, e.g. `3f2a9c01de_photo`. The stem stays last so a trailing `-WxH`
/// on a re-uploaded derivative is still recognized.
pub fn derive_hash(file_name: &Path, data: &[u8]) -> String {
    let digest = hex::encode(Sha256::digest(data));
    let stem = file_name
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    let stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        digest[..10].to_string()
    } else {
        format!("{}_{}", &digest[..10], stem)
    }
}

/// File extension with leading dot, lowercased; empty when there is none.
pub fn extension_of(file_name: &Path) -> String {
    file_name
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Detect content type from extension
pub fn guess_mime_type(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "json" => "application/json",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
