#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// bounding box set utilities.
pub mod bbox;

/// error types for geometry sampling and remapping.
pub mod error;

/// frame size type.
pub mod frame;

/// the sampled geometry descriptor.
pub mod geometry;

/// keypoint type.
pub mod keypoint;

/// coordinate remapping under a sampled geometry.
pub mod map;

/// segmentation mask rasters.
pub mod mask;

/// pixel-space and normalized rectangles.
pub mod rect;

pub use error::GeometryError;
pub use frame::FrameSize;
pub use geometry::{Geometry, PadAmounts, Padding};
pub use keypoint::Keypoint;
pub use mask::{Mask, MaskValue};
pub use rect::{NormalizedRect, PixelRect};
