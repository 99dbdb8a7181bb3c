//! Upload and delete orchestration

pub mod delete;
pub mod error;
pub mod pipeline;
pub mod types;

pub use delete::DeleteOrchestrator;
pub use error::{DeleteError, UploadError};
pub use pipeline::UploadOrchestrator;
pub use types::{DeleteReport, DerivedAsset, UploadReport};
