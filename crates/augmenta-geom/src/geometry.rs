use crate::frame::FrameSize;
use crate::rect::PixelRect;

/// Per-side padding amounts in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PadAmounts {
    /// Pixels added above the frame.
    pub top: usize,
    /// Pixels added to the right of the frame.
    pub right: usize,
    /// Pixels added below the frame.
    pub bottom: usize,
    /// Pixels added to the left of the frame.
    pub left: usize,
}

impl PadAmounts {
    /// Whether no side is padded.
    pub fn is_zero(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }

    /// Total horizontal growth in pixels.
    pub fn horizontal(&self) -> usize {
        self.left + self.right
    }

    /// Total vertical growth in pixels.
    pub fn vertical(&self) -> usize {
        self.top + self.bottom
    }
}

/// Padding part of a sampled geometry.
///
/// Carries the per-side amounts together with the constant fill values the
/// raster collaborator uses for image and mask buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Padding {
    /// Per-side pad amounts.
    pub amounts: PadAmounts,
    /// Fill value for image pixels under a constant border.
    pub fill: f64,
    /// Fill value for mask pixels under a constant border.
    pub fill_mask: f64,
}

/// Immutable descriptor of one sampled geometric transform.
///
/// A sampler produces exactly one `Geometry` per augmented sample; every
/// target of that sample (image, mask, boxes, keypoints) must be transformed
/// through this same descriptor. The parts apply in a fixed order: crop,
/// then padding, then resizing.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    /// The source frame the geometry was sampled for.
    pub frame: FrameSize,
    /// Window to extract from the source frame, if any.
    pub crop: Option<PixelRect>,
    /// Padding applied to the cropped result, if any.
    pub pad: Option<Padding>,
    /// Final resize target, if any.
    pub resize: Option<FrameSize>,
}

impl Geometry {
    /// A descriptor that leaves every target untouched.
    pub fn identity(frame: FrameSize) -> Self {
        Self {
            frame,
            crop: None,
            pad: None,
            resize: None,
        }
    }

    /// A pure crop descriptor.
    pub fn from_crop(frame: FrameSize, crop: PixelRect) -> Self {
        Self {
            frame,
            crop: Some(crop),
            pad: None,
            resize: None,
        }
    }

    /// Frame size after the crop step.
    ///
    /// Uses the window's own extents even when they reach past the source
    /// frame; windows that do get clipped by the raster collaborator keep
    /// their nominal size for coordinate mapping.
    pub fn cropped_size(&self) -> FrameSize {
        match self.crop {
            Some(rect) => FrameSize {
                width: rect.width().max(0) as usize,
                height: rect.height().max(0) as usize,
            },
            None => self.frame,
        }
    }

    /// Frame size after the crop and pad steps.
    pub fn padded_size(&self) -> FrameSize {
        let cropped = self.cropped_size();
        match self.pad {
            Some(pad) => FrameSize {
                width: cropped.width + pad.amounts.horizontal(),
                height: cropped.height + pad.amounts.vertical(),
            },
            None => cropped,
        }
    }

    /// Final frame size all targets end up in.
    pub fn output_size(&self) -> FrameSize {
        self.resize.unwrap_or_else(|| self.padded_size())
    }

    /// Whether the descriptor changes nothing.
    pub fn is_identity(&self) -> bool {
        self.crop.is_none() && self.pad.is_none() && self.resize.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, PadAmounts, Padding};
    use crate::frame::FrameSize;
    use crate::rect::PixelRect;

    #[test]
    fn sizes_chain_through_crop_pad_resize() {
        let frame = FrameSize {
            width: 10,
            height: 8,
        };
        let mut geometry = Geometry::from_crop(frame, PixelRect::new(1, 2, 7, 8));
        assert_eq!(geometry.cropped_size(), FrameSize::from([6, 6]));

        geometry.pad = Some(Padding {
            amounts: PadAmounts {
                top: 1,
                right: 2,
                bottom: 3,
                left: 0,
            },
            fill: 0.0,
            fill_mask: 0.0,
        });
        assert_eq!(geometry.padded_size(), FrameSize::from([8, 10]));

        geometry.resize = Some(FrameSize::from([4, 5]));
        assert_eq!(geometry.output_size(), FrameSize::from([4, 5]));
    }

    #[test]
    fn identity_descriptor() {
        let frame = FrameSize {
            width: 3,
            height: 3,
        };
        let geometry = Geometry::identity(frame);
        assert!(geometry.is_identity());
        assert_eq!(geometry.output_size(), frame);
    }
}
