//! Image processing module
//!
//! - Decoding source bytes (transformer)
//! - Geometry for the supported fit modes (resize)

pub mod resize;
pub mod transformer;

pub use resize::ImageResize;
pub use transformer::ImageTransformer;
