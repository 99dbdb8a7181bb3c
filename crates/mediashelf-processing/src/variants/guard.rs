//! Recognizes files that are themselves derivatives, so they are never planned again.

use mediashelf_core::constants::DERIVATIVE_PREFIXES;
use mediashelf_core::{AddressingConvention, VariantSource};
use regex::Regex;

/// Matches hashes carrying a derivative marker for one addressing convention
#[derive(Debug, Clone)]
pub struct DerivativeGuard {
    pattern: Regex,
}

impl DerivativeGuard {
    /// Build the guard for a variant source.
    ///
    /// Labeled sources match any known derivative prefix (including `{label}_` for each
    /// configured preset) anywhere in the hash. Dimensioned sources match a trailing
    /// `-{W}x{H}` suffix.
    pub fn new(source: &VariantSource) -> Result<Self, regex::Error> {
        let pattern = match source.convention() {
            AddressingConvention::Labeled => {
                let mut prefixes: Vec<String> = DERIVATIVE_PREFIXES
                    .iter()
                    .map(|prefix| regex::escape(prefix))
                    .collect();
                for label in source.labels() {
                    let prefix = regex::escape(&format!("{}_", label.trim()));
                    if !prefixes.contains(&prefix) {
                        prefixes.push(prefix);
                    }
                }
                Regex::new(&format!("(?:{})", prefixes.join("|")))?
            }
            AddressingConvention::Dimensioned => Regex::new(r"-\d+x\d+$")?,
        };

        Ok(Self { pattern })
    }

    pub fn is_derivative(&self, hash: &str) -> bool {
        self.pattern.is_match(hash)
    }
}
