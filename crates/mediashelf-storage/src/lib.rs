//! Mediashelf Storage Library
//!
//! This crate provides the storage abstraction the orchestrators write through, the
//! key addressing both of them share, and the S3, local filesystem and in-memory backends.
//!
//! # Storage key format
//!
//! `{prefix}{path/}{base}` where `base` is one of:
//!
//! - **Original**: `{hash}{ext}`
//! - **Labeled variant**: `{label}_{hash}{ext}`
//! - **Dimensioned variant**: `{hash}-{W}x{H}{ext}`
//!
//! Key generation is centralized in the `keys` module so uploads and deletes always agree.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{build_key, public_url, KeyName};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediashelf_core::StorageBackend;
pub use memory::{MemoryStorage, StoredObject};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
