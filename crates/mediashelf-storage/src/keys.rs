//! Shared key generation for uploads and deletes.
//!
//! Key format: `{prefix}{path/}{base}`. Empty values and the `-` sentinel contribute
//! nothing; a path is followed by exactly one `/`. Both orchestrators derive every key
//! through [`build_key`], which keeps the delete set identical to the upload set.

use mediashelf_core::constants::DISABLED_SENTINEL;

/// The file-name part of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyName<'a> {
    /// `{hash}{ext}`
    Original,
    /// `{label}_{hash}{ext}`
    Labeled(&'a str),
    /// `{hash}-{suffix}{ext}`, suffix being `WxH`
    Dimensioned(&'a str),
}

fn normalize(segment: Option<&str>) -> &str {
    match segment.map(str::trim) {
        Some(s) if !s.is_empty() && s != DISABLED_SENTINEL => s,
        _ => "",
    }
}

/// Build the object key for a file or one of its variants.
pub fn build_key(
    prefix: &str,
    path: Option<&str>,
    hash: &str,
    name: KeyName<'_>,
    extension: &str,
) -> String {
    let prefix = normalize(Some(prefix));
    let path = normalize(path).trim_end_matches('/');

    let base = match name {
        KeyName::Original => format!("{}{}", hash, extension),
        KeyName::Labeled(label) => format!("{}_{}{}", label, hash, extension),
        KeyName::Dimensioned(suffix) => format!("{}-{}{}", hash, suffix, extension),
    };

    if path.is_empty() {
        format!("{}{}", prefix, base)
    } else {
        format!("{}{}/{}", prefix, path, base)
    }
}

/// Public URL of a stored object: the custom domain joined with the key when one is
/// configured, otherwise the location reported by the store.
pub fn public_url(custom_domain: Option<&str>, location: &str, key: &str) -> String {
    match normalize(custom_domain) {
        "" => location.to_string(),
        domain => format!("{}/{}", domain.trim_end_matches('/'), key),
    }
}
