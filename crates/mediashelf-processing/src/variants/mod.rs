//! Variant derivation
//!
//! - [`planner`]: which variants a file gets
//! - [`guard`]: recognizing files that are already derivatives
//! - [`renderer`]: resizing and encoding one variant
//! - [`plan`]: the keys of every object a file maps to, shared by upload and delete

pub mod guard;
pub mod plan;
pub mod planner;
pub mod renderer;

pub use guard::DerivativeGuard;
pub use plan::{ObjectPlan, PlannedObject, PlannedVariant};
pub use planner::VariantPlanner;
pub use renderer::{target_formats, RenderError, RenderedVariant, VariantRenderer};
