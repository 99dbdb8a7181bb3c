//! Error types module
//!
//! Configuration problems are surfaced before any upload or delete is attempted.
//! Storage, render and orchestration errors live next to the code that raises them
//! (`mediashelf-storage` and `mediashelf-processing`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid variant definition {line:?}: {reason}")]
    InvalidVariant { line: String, reason: String },

    #[error("Image quality {0} is out of range (expected 10-100)")]
    QualityOutOfRange(i64),

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid variant presets: {0}")]
    Presets(#[from] serde_json::Error),
}

/// Result type for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;
