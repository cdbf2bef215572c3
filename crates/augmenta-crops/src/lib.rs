#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// crop samplers driven by the current bounding boxes.
pub mod bbox;

/// border-biased crop sampler.
pub mod borders;

/// basic crop samplers.
pub mod crop;

/// the crop/pad unifier.
pub mod crop_and_pad;

/// interpolation vocabulary for the raster collaborator.
pub mod interpolation;

/// mask-guided crop sampler.
pub mod mask;

/// crop samplers with a resize target.
pub mod resized;

/// the closed set of sampling strategies.
pub mod sampler;

/// run-time target data for samplers.
pub mod targets;

pub use bbox::{BBoxSafeRandomCrop, RandomCropNearBBox, RandomSizedBBoxSafeCrop};
pub use borders::RandomCropFromBorders;
pub use crop::{CenterCrop, Crop, RandomCrop};
pub use crop_and_pad::{
    BorderMode, CropAndPad, FillSpec, PercentSpec, PxSpec, SidePercentSpec, SidePxSpec,
};
pub use interpolation::InterpolationMode;
pub use mask::CropNonEmptyMaskIfExists;
pub use resized::{RandomResizedCrop, RandomSizedCrop};
pub use sampler::CropSampler;
pub use targets::{TargetKey, Targets};
