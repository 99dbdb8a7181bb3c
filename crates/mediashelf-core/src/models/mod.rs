pub mod file;
pub mod variant;

pub use file::FileAsset;
pub use variant::{
    AddressingConvention, FitMode, ResizeOptions, VariantDimensions, VariantPreset, VariantSpec,
};
