//! Mediashelf Core Library
//!
//! This crate provides the domain models, error types, configuration and constants
//! shared by the storage, processing and CLI crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Credentials, StoreSettings, UploadConfig, VariantSource};
pub use error::{ConfigError, ConfigResult};
pub use models::{
    AddressingConvention, FileAsset, FitMode, ResizeOptions, VariantDimensions, VariantPreset,
    VariantSpec,
};
pub use storage_types::StorageBackend;
