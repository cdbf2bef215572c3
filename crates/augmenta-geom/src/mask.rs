use std::ops::BitOr;

use num_traits::Zero;

use crate::error::GeometryError;
use crate::frame::FrameSize;

/// Element type of a [`Mask`].
///
/// Covers the integer label types segmentation rasters use; `Zero` is the
/// background value and `BitOr` combines labels when masks are unioned.
pub trait MaskValue: Copy + PartialEq + Zero + BitOr<Output = Self> {}

impl<T> MaskValue for T where T: Copy + PartialEq + Zero + BitOr<Output = T> {}

/// A segmentation mask raster with shape (height, width, channels).
///
/// # Examples
///
/// ```
/// use augmenta_geom::{FrameSize, Mask};
///
/// let mask = Mask::<u8>::new(
///     FrameSize { width: 3, height: 2 },
///     1,
///     vec![0, 0, 1, 0, 2, 0],
/// ).unwrap();
///
/// assert_eq!(mask.value(0, 2, 0), 1);
/// assert_eq!(mask.value(1, 1, 0), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Mask<T = u8> {
    size: FrameSize,
    channels: usize,
    data: Vec<T>,
}

impl<T: MaskValue> Mask<T> {
    /// Create a mask from raw data in row-major (height, width, channels)
    /// order.
    ///
    /// # Errors
    ///
    /// Fails when `channels` is zero or the buffer length does not match the
    /// shape.
    pub fn new(size: FrameSize, channels: usize, data: Vec<T>) -> Result<Self, GeometryError> {
        if channels == 0 {
            return Err(GeometryError::InvalidConfiguration(
                "mask must have at least one channel".to_string(),
            ));
        }
        let expected = size.area() * channels;
        if data.len() != expected {
            return Err(GeometryError::InvalidMaskShape {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            size,
            channels,
            data,
        })
    }

    /// Create a mask filled with a single value.
    pub fn from_size_val(size: FrameSize, channels: usize, value: T) -> Result<Self, GeometryError> {
        Self::new(size, channels, vec![value; size.area() * channels])
    }

    /// Size of the mask in pixels.
    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Number of channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Raw mask data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Value at (row, col, channel).
    pub fn value(&self, row: usize, col: usize, channel: usize) -> T {
        self.data[(row * self.size.width + col) * self.channels + channel]
    }

    /// Combine two masks with an elementwise bitwise OR into a new mask.
    ///
    /// Neither input is mutated.
    ///
    /// # Errors
    ///
    /// Fails with [`GeometryError::InvalidMaskShape`] when the shapes differ.
    pub fn union(&self, other: &Self) -> Result<Mask<T>, GeometryError> {
        if self.size != other.size || self.channels != other.channels {
            return Err(GeometryError::InvalidMaskShape {
                expected: self.data.len(),
                got: other.data.len(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a | b)
            .collect();
        Ok(Mask {
            size: self.size,
            channels: self.channels,
            data,
        })
    }

    /// Whether any element is a non-background value.
    pub fn any_foreground(&self) -> bool {
        self.data.iter().any(|v| !v.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::Mask;
    use crate::error::GeometryError;
    use crate::frame::FrameSize;

    #[test]
    fn new_validates_shape() {
        let size = FrameSize {
            width: 2,
            height: 2,
        };
        let err = Mask::<u8>::new(size, 1, vec![0; 3]).unwrap_err();
        assert_eq!(err, GeometryError::InvalidMaskShape { expected: 4, got: 3 });

        assert!(Mask::<u8>::new(size, 0, vec![]).is_err());
    }

    #[test]
    fn union_folds_labels() -> Result<(), GeometryError> {
        let size = FrameSize {
            width: 2,
            height: 1,
        };
        let a = Mask::<u8>::new(size, 1, vec![0, 1])?;
        let b = Mask::<u8>::new(size, 1, vec![2, 0])?;

        let combined = a.union(&b)?;
        assert_eq!(combined.as_slice(), &[2, 1]);
        // inputs untouched
        assert_eq!(a.as_slice(), &[0, 1]);
        assert_eq!(b.as_slice(), &[2, 0]);

        Ok(())
    }

    #[test]
    fn union_rejects_shape_mismatch() -> Result<(), GeometryError> {
        let a = Mask::<u8>::from_size_val(FrameSize { width: 2, height: 1 }, 1, 0)?;
        let b = Mask::<u8>::from_size_val(FrameSize { width: 1, height: 2 }, 1, 0)?;
        assert!(a.union(&b).is_err());
        Ok(())
    }

    #[test]
    fn foreground_detection() -> Result<(), GeometryError> {
        let size = FrameSize {
            width: 2,
            height: 1,
        };
        assert!(!Mask::<u8>::from_size_val(size, 1, 0)?.any_foreground());
        assert!(Mask::<u8>::new(size, 1, vec![0, 7])?.any_foreground());
        Ok(())
    }
}
