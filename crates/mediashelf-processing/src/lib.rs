//! Mediashelf Media Processing Library
//!
//! This crate derives image variants and drives uploads and deletes through a
//! [`Storage`](mediashelf_storage::Storage) backend:
//!
//! - [`variants`]: planning, the derivative guard, rendering and the shared key plan
//! - [`image`] / [`compression`]: resize and encode primitives
//! - [`upload`]: the upload and delete orchestrators

pub mod compression;
pub mod image;
pub mod upload;
pub mod variants;

// Re-export commonly used types
pub use compression::{ImageCompressor, OutputFormat, SourceFormat};
pub use crate::image::{ImageResize, ImageTransformer};
pub use upload::{
    DeleteError, DeleteOrchestrator, DeleteReport, DerivedAsset, UploadError, UploadOrchestrator,
    UploadReport,
};
pub use variants::{
    target_formats, ObjectPlan, PlannedObject, RenderError, RenderedVariant, VariantPlanner,
    VariantRenderer,
};
