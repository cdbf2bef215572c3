use augmenta_geom::{FrameSize, Geometry, GeometryError, PixelRect};
use rand::Rng;

use crate::crop::{ensure_fits, random_crop_rect};
use crate::interpolation::InterpolationMode;

const REJECTION_ATTEMPTS: usize = 10;

/// Crop a random part of the frame with a height drawn from a range, then
/// rescale it to a fixed output size.
///
/// The crop width follows the drawn height through `w2h_ratio`.
#[derive(Clone, Debug)]
pub struct RandomSizedCrop {
    min_height: usize,
    max_height: usize,
    height: usize,
    width: usize,
    w2h_ratio: f64,
    interpolation: InterpolationMode,
}

impl RandomSizedCrop {
    /// Create a sampler drawing crop heights from `min_max_height`
    /// (inclusive) and resizing to `height` x `width`.
    pub fn new(
        min_max_height: (usize, usize),
        height: usize,
        width: usize,
        w2h_ratio: f64,
    ) -> Result<Self, GeometryError> {
        let (min_height, max_height) = min_max_height;
        if min_height == 0 || min_height > max_height {
            return Err(GeometryError::InvalidConfiguration(format!(
                "invalid crop height range {min_height}..={max_height}"
            )));
        }
        if height == 0 || width == 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "output size must be positive, got {height}x{width}"
            )));
        }
        if !(w2h_ratio > 0.0) || (min_height as f64 * w2h_ratio) < 1.0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "w2h_ratio {w2h_ratio} collapses the crop width"
            )));
        }
        Ok(Self {
            min_height,
            max_height,
            height,
            width,
            w2h_ratio,
            interpolation: InterpolationMode::Bilinear,
        })
    }

    /// Interpolation for the resize step.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Interpolation the raster collaborator should use.
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Sample a crop window plus resize target for `frame`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        frame: FrameSize,
        rng: &mut R,
    ) -> Result<Geometry, GeometryError> {
        let crop_height = rng.random_range(self.min_height..=self.max_height);
        let crop = FrameSize {
            width: (crop_height as f64 * self.w2h_ratio) as usize,
            height: crop_height,
        };
        ensure_fits(crop, frame)?;

        let h_start = rng.random::<f64>();
        let w_start = rng.random::<f64>();
        let mut geometry =
            Geometry::from_crop(frame, random_crop_rect(frame, crop, h_start, w_start));
        geometry.resize = Some(FrameSize {
            width: self.width,
            height: self.height,
        });
        Ok(geometry)
    }
}

/// Crop a random area/aspect constrained part of the frame and rescale it to
/// a fixed output size.
///
/// Candidate windows are rejection-sampled: an area fraction is drawn from
/// `scale`, an aspect ratio log-uniformly from `ratio`, and the implied
/// window is accepted when it fits the frame. After ten failed attempts the
/// sampler deterministically falls back to the largest centered window that
/// matches the nearest bound of the ratio range.
#[derive(Clone, Debug)]
pub struct RandomResizedCrop {
    height: usize,
    width: usize,
    scale: (f64, f64),
    ratio: (f64, f64),
    interpolation: InterpolationMode,
}

impl RandomResizedCrop {
    /// Create a sampler resizing to `height` x `width`, keeping between
    /// `scale.0` and `scale.1` of the source area at an aspect ratio within
    /// `ratio`.
    pub fn new(
        height: usize,
        width: usize,
        scale: (f64, f64),
        ratio: (f64, f64),
    ) -> Result<Self, GeometryError> {
        if height == 0 || width == 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "output size must be positive, got {height}x{width}"
            )));
        }
        if !(scale.0 > 0.0 && scale.0 <= scale.1) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "invalid area fraction range {:?}",
                scale
            )));
        }
        if !(ratio.0 > 0.0 && ratio.0 <= ratio.1) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "invalid aspect ratio range {:?}",
                ratio
            )));
        }
        Ok(Self {
            height,
            width,
            scale,
            ratio,
            interpolation: InterpolationMode::Bilinear,
        })
    }

    /// Interpolation for the resize step.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Interpolation the raster collaborator should use.
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Sample a crop window plus resize target for `frame`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        frame: FrameSize,
        rng: &mut R,
    ) -> Result<Geometry, GeometryError> {
        if frame.is_empty() {
            return Err(GeometryError::InvalidGeometry {
                width: frame.width,
                height: frame.height,
            });
        }

        let area = frame.area() as f64;
        let log_ratio = (self.ratio.0.ln(), self.ratio.1.ln());

        for _ in 0..REJECTION_ATTEMPTS {
            let target_area = rng.random_range(self.scale.0..=self.scale.1) * area;
            let aspect = rng.random_range(log_ratio.0..=log_ratio.1).exp();

            let width = (target_area * aspect).sqrt().round() as i64;
            let height = (target_area / aspect).sqrt().round() as i64;

            if width > 0
                && width <= frame.width as i64
                && height > 0
                && height <= frame.height as i64
            {
                let y_min = rng.random_range(0..=frame.height as i64 - height);
                let x_min = rng.random_range(0..=frame.width as i64 - width);
                let mut geometry = Geometry::from_crop(
                    frame,
                    PixelRect::new(x_min, y_min, x_min + width, y_min + height),
                );
                geometry.resize = Some(self.output());
                return Ok(geometry);
            }
        }

        log::debug!(
            "no window satisfied scale {:?} / ratio {:?} on {frame} after {REJECTION_ATTEMPTS} attempts, using centered fallback",
            self.scale,
            self.ratio
        );
        let mut geometry = Geometry::from_crop(frame, self.fallback_window(frame));
        geometry.resize = Some(self.output());
        Ok(geometry)
    }

    /// Largest centered window matching the nearest bound of the ratio
    /// range; the whole frame when its aspect already lies inside.
    fn fallback_window(&self, frame: FrameSize) -> PixelRect {
        let in_ratio = frame.width as f64 / frame.height as f64;
        let (width, height) = if in_ratio < self.ratio.0 {
            let width = frame.width as i64;
            (width, (width as f64 / self.ratio.0).round() as i64)
        } else if in_ratio > self.ratio.1 {
            let height = frame.height as i64;
            ((height as f64 * self.ratio.1).round() as i64, height)
        } else {
            (frame.width as i64, frame.height as i64)
        };
        let x_min = (frame.width as i64 - width) / 2;
        let y_min = (frame.height as i64 - height) / 2;
        PixelRect::new(x_min, y_min, x_min + width, y_min + height)
    }

    fn output(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RandomResizedCrop, RandomSizedCrop};
    use augmenta_geom::{FrameSize, GeometryError, PixelRect};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sized_crop_respects_range_and_ratio() -> Result<(), GeometryError> {
        let sampler = RandomSizedCrop::new((10, 20), 32, 32, 1.5)?;
        let frame = FrameSize {
            width: 64,
            height: 48,
        };
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let geometry = sampler.sample(frame, &mut rng)?;
            let crop = geometry.crop.unwrap();
            assert!(crop.is_valid_for(frame));
            assert!((10..=20).contains(&(crop.height() as usize)));
            assert_eq!(crop.width(), (crop.height() as f64 * 1.5) as i64);
            assert_eq!(geometry.resize, Some(FrameSize::from([32, 32])));
        }
        Ok(())
    }

    #[test]
    fn resized_crop_accepted_windows_fit_the_frame() -> Result<(), GeometryError> {
        let sampler = RandomResizedCrop::new(32, 32, (0.08, 1.0), (0.75, 4.0 / 3.0))?;
        let frame = FrameSize {
            width: 50,
            height: 40,
        };
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..500 {
            let geometry = sampler.sample(frame, &mut rng)?;
            let crop = geometry.crop.unwrap();
            assert!(crop.is_valid_for(frame), "out of bounds: {crop:?}");
            assert_eq!(geometry.resize, Some(FrameSize::from([32, 32])));
        }
        Ok(())
    }

    #[test]
    fn impossible_ratio_hits_the_documented_fallback() -> Result<(), GeometryError> {
        // frame aspect is 2.0, the ratio range demands at least 4.0: every
        // candidate is wider than the frame, so the centered fallback with
        // width=100, height=round(100/4)=25 must come out, regardless of rng.
        let sampler = RandomResizedCrop::new(32, 32, (0.9, 1.0), (4.0, 5.0))?;
        let frame = FrameSize {
            width: 100,
            height: 50,
        };

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let geometry = sampler.sample(frame, &mut rng)?;
            assert_eq!(geometry.crop.unwrap(), PixelRect::new(0, 12, 100, 37));
        }
        Ok(())
    }

    #[test]
    fn narrow_frame_fallback_matches_the_lower_ratio_bound() -> Result<(), GeometryError> {
        // frame aspect 0.5 is below the minimum ratio 2.0: height follows
        // width through the lower bound.
        let sampler = RandomResizedCrop::new(16, 16, (0.95, 1.0), (2.0, 3.0))?;
        let frame = FrameSize {
            width: 50,
            height: 100,
        };
        let mut rng = StdRng::seed_from_u64(11);

        let geometry = sampler.sample(frame, &mut rng)?;
        // width=50, height=round(50/2)=25, centered vertically
        assert_eq!(geometry.crop.unwrap(), PixelRect::new(0, 37, 50, 62));
        Ok(())
    }

    #[test]
    fn configuration_is_validated_eagerly() {
        assert!(RandomResizedCrop::new(0, 32, (0.1, 1.0), (1.0, 2.0)).is_err());
        assert!(RandomResizedCrop::new(32, 32, (0.0, 1.0), (1.0, 2.0)).is_err());
        assert!(RandomResizedCrop::new(32, 32, (0.5, 0.1), (1.0, 2.0)).is_err());
        assert!(RandomResizedCrop::new(32, 32, (0.1, 1.0), (2.0, 1.0)).is_err());
        assert!(RandomSizedCrop::new((0, 10), 32, 32, 1.0).is_err());
        assert!(RandomSizedCrop::new((20, 10), 32, 32, 1.0).is_err());
        assert!(RandomSizedCrop::new((10, 20), 32, 32, 0.0).is_err());
    }
}
