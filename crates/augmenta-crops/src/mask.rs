use augmenta_geom::{FrameSize, Geometry, GeometryError, Mask, MaskValue, PixelRect};
use rand::Rng;

use crate::crop::ensure_fits;

/// Crop around mask foreground if there is any, else crop at random.
///
/// Masks are preprocessed first: values listed in `ignore_values` count as
/// background, and channels listed in `ignore_channels` are skipped. When
/// several masks are supplied they are folded into one combined mask with a
/// bitwise OR. If any foreground survives, one foreground pixel is picked
/// uniformly and the window is jittered around it so the pixel stays inside;
/// an all-background mask falls back to a uniform random crop.
///
/// The frame is taken from the mask itself; masks are expected to annotate
/// the same frame as the other targets of the sample.
#[derive(Clone, Debug)]
pub struct CropNonEmptyMaskIfExists<T: MaskValue = u8> {
    height: usize,
    width: usize,
    ignore_values: Vec<T>,
    ignore_channels: Vec<usize>,
}

impl<T: MaskValue> CropNonEmptyMaskIfExists<T> {
    /// Create a sampler producing `height` x `width` windows.
    pub fn new(height: usize, width: usize) -> Result<Self, GeometryError> {
        if height == 0 || width == 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "crop size must be positive, got {height}x{width}"
            )));
        }
        Ok(Self {
            height,
            width,
            ignore_values: Vec::new(),
            ignore_channels: Vec::new(),
        })
    }

    /// Treat these mask values as background.
    pub fn with_ignore_values(mut self, values: Vec<T>) -> Self {
        self.ignore_values = values;
        self
    }

    /// Skip these mask channels when looking for foreground.
    pub fn with_ignore_channels(mut self, channels: Vec<usize>) -> Self {
        self.ignore_channels = channels;
        self
    }

    /// Sample a crop window guided by the supplied masks.
    ///
    /// # Errors
    ///
    /// Fails with [`GeometryError::MissingTarget`] when no mask is given and
    /// [`GeometryError::InvalidCropSize`] when the crop exceeds the mask.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        masks: &[&Mask<T>],
        rng: &mut R,
    ) -> Result<Geometry, GeometryError> {
        let (first, rest) = masks
            .split_first()
            .ok_or_else(|| GeometryError::MissingTarget("mask".to_string()))?;

        let mut combined = self.preprocess(first)?;
        for mask in rest {
            combined = combined.union(&self.preprocess(mask)?)?;
        }

        let frame = combined.size();
        let crop = FrameSize {
            width: self.width,
            height: self.height,
        };
        ensure_fits(crop, frame)?;

        let foreground = self.foreground_coords(&combined);
        let (x_min, y_min) = if !foreground.is_empty() {
            let (row, col) = foreground[rng.random_range(0..foreground.len())];
            let x_jitter = rng.random_range(0..self.width) as i64;
            let y_jitter = rng.random_range(0..self.height) as i64;
            (
                (col as i64 - x_jitter).clamp(0, (frame.width - self.width) as i64),
                (row as i64 - y_jitter).clamp(0, (frame.height - self.height) as i64),
            )
        } else {
            (
                rng.random_range(0..=frame.width - self.width) as i64,
                rng.random_range(0..=frame.height - self.height) as i64,
            )
        };

        Ok(Geometry::from_crop(
            frame,
            PixelRect::from_origin(x_min, y_min, crop),
        ))
    }

    /// Zero out ignored values and channels, producing a fresh mask.
    fn preprocess(&self, mask: &Mask<T>) -> Result<Mask<T>, GeometryError> {
        let channels = mask.channels();
        let data = mask
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let channel = i % channels;
                if self.ignore_channels.contains(&channel) || self.ignore_values.contains(&v) {
                    T::zero()
                } else {
                    v
                }
            })
            .collect();
        Mask::new(mask.size(), channels, data)
    }

    /// Row-major coordinates of all pixels with any foreground channel.
    fn foreground_coords(&self, mask: &Mask<T>) -> Vec<(usize, usize)> {
        let size = mask.size();
        let mut coords = Vec::new();
        for row in 0..size.height {
            for col in 0..size.width {
                let any = (0..mask.channels()).any(|c| !mask.value(row, col, c).is_zero());
                if any {
                    coords.push((row, col));
                }
            }
        }
        coords
    }
}
