use augmenta_geom::{FrameSize, Geometry, GeometryError, PixelRect};
use rand::Rng;

/// Check that a crop fits into a frame.
pub(crate) fn ensure_fits(crop: FrameSize, frame: FrameSize) -> Result<(), GeometryError> {
    if crop.width > frame.width || crop.height > frame.height {
        return Err(GeometryError::InvalidCropSize {
            crop_width: crop.width,
            crop_height: crop.height,
            frame_width: frame.width,
            frame_height: frame.height,
        });
    }
    Ok(())
}

/// Place a crop of `crop` size inside `frame` from two fractional offsets in
/// `[0, 1)`, scaled by the free slack on each axis.
///
/// Callers must have checked that the crop fits.
pub(crate) fn random_crop_rect(
    frame: FrameSize,
    crop: FrameSize,
    h_start: f64,
    w_start: f64,
) -> PixelRect {
    let y_min = ((frame.height - crop.height) as f64 * h_start) as i64;
    let x_min = ((frame.width - crop.width) as f64 * w_start) as i64;
    PixelRect::from_origin(x_min, y_min, crop)
}

/// Crop a random part of the frame.
///
/// # Examples
///
/// ```
/// use augmenta_crops::RandomCrop;
/// use augmenta_geom::FrameSize;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let sampler = RandomCrop::new(4, 4)?;
/// let mut rng = StdRng::seed_from_u64(0);
///
/// let geometry = sampler.sample(FrameSize { width: 10, height: 10 }, &mut rng)?;
/// let crop = geometry.crop.unwrap();
/// assert!(crop.is_valid_for(geometry.frame));
/// # Ok::<(), augmenta_geom::GeometryError>(())
/// ```
#[derive(Clone, Debug)]
pub struct RandomCrop {
    height: usize,
    width: usize,
}

impl RandomCrop {
    /// Create a sampler producing `height` x `width` windows.
    pub fn new(height: usize, width: usize) -> Result<Self, GeometryError> {
        if height == 0 || width == 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "crop size must be positive, got {height}x{width}"
            )));
        }
        Ok(Self { height, width })
    }

    /// Sample a crop window for `frame`.
    ///
    /// Consumes two uniform draws (vertical then horizontal offset).
    pub fn sample<R: Rng + ?Sized>(
        &self,
        frame: FrameSize,
        rng: &mut R,
    ) -> Result<Geometry, GeometryError> {
        let crop = FrameSize {
            width: self.width,
            height: self.height,
        };
        ensure_fits(crop, frame)?;
        let h_start = rng.random::<f64>();
        let w_start = rng.random::<f64>();
        Ok(Geometry::from_crop(
            frame,
            random_crop_rect(frame, crop, h_start, w_start),
        ))
    }
}

/// Crop the central part of the frame.
#[derive(Clone, Debug)]
pub struct CenterCrop {
    height: usize,
    width: usize,
}

impl CenterCrop {
    /// Create a sampler producing centered `height` x `width` windows.
    pub fn new(height: usize, width: usize) -> Result<Self, GeometryError> {
        if height == 0 || width == 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "crop size must be positive, got {height}x{width}"
            )));
        }
        Ok(Self { height, width })
    }

    /// Compute the centered crop window for `frame`.
    pub fn sample(&self, frame: FrameSize) -> Result<Geometry, GeometryError> {
        let crop = FrameSize {
            width: self.width,
            height: self.height,
        };
        ensure_fits(crop, frame)?;
        let y_min = ((frame.height - self.height) / 2) as i64;
        let x_min = ((frame.width - self.width) / 2) as i64;
        Ok(Geometry::from_crop(
            frame,
            PixelRect::from_origin(x_min, y_min, crop),
        ))
    }
}

/// Crop an explicitly given region from the frame.
///
/// The window may reach past the frame; it is clamped at sample time, never
/// rejected.
#[derive(Clone, Debug)]
pub struct Crop {
    window: PixelRect,
}

impl Crop {
    /// Create a sampler extracting the given window.
    pub fn new(x_min: i64, y_min: i64, x_max: i64, y_max: i64) -> Result<Self, GeometryError> {
        if x_min < 0 || y_min < 0 || x_min >= x_max || y_min >= y_max {
            return Err(GeometryError::InvalidConfiguration(format!(
                "invalid crop window ({x_min},{y_min})..({x_max},{y_max})"
            )));
        }
        Ok(Self {
            window: PixelRect::new(x_min, y_min, x_max, y_max),
        })
    }

    /// Clamp the configured window into `frame`.
    ///
    /// # Errors
    ///
    /// A window lying entirely outside the frame clamps to nothing and is
    /// reported as [`GeometryError::InvalidCropSize`].
    pub fn sample(&self, frame: FrameSize) -> Result<Geometry, GeometryError> {
        let clamped = self.window.clamp_to(frame);
        if clamped.size().is_none() {
            return Err(GeometryError::InvalidCropSize {
                crop_width: self.window.width().max(0) as usize,
                crop_height: self.window.height().max(0) as usize,
                frame_width: frame.width,
                frame_height: frame.height,
            });
        }
        Ok(Geometry::from_crop(frame, clamped))
    }
}

#[cfg(test)]
mod tests {
    use super::{CenterCrop, Crop, RandomCrop};
    use augmenta_geom::{FrameSize, GeometryError, PixelRect};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_crop_stays_in_bounds_for_every_draw() -> Result<(), GeometryError> {
        let sampler = RandomCrop::new(4, 7)?;
        let frame = FrameSize {
            width: 13,
            height: 9,
        };
        let mut rng = StdRng::seed_from_u64(1234);

        for _ in 0..1000 {
            let geometry = sampler.sample(frame, &mut rng)?;
            let crop = geometry.crop.unwrap();
            assert!(crop.is_valid_for(frame), "out of bounds: {crop:?}");
            assert_eq!(crop.width(), 7);
            assert_eq!(crop.height(), 4);
        }
        Ok(())
    }

    #[test]
    fn random_crop_rejects_oversized_crop() {
        let sampler = RandomCrop::new(20, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = sampler
            .sample(
                FrameSize {
                    width: 10,
                    height: 10,
                },
                &mut rng,
            )
            .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidCropSize { .. }));
    }

    #[test]
    fn center_crop_is_deterministic() -> Result<(), GeometryError> {
        let sampler = CenterCrop::new(4, 4)?;
        let frame = FrameSize {
            width: 10,
            height: 9,
        };

        let first = sampler.sample(frame)?;
        for _ in 0..10 {
            assert_eq!(sampler.sample(frame)?, first);
        }
        assert_eq!(first.crop.unwrap(), PixelRect::new(3, 2, 7, 6));
        Ok(())
    }

    #[test]
    fn explicit_crop_clamps_to_frame() -> Result<(), GeometryError> {
        let sampler = Crop::new(5, 5, 30, 30)?;
        let geometry = sampler.sample(FrameSize {
            width: 10,
            height: 20,
        })?;
        assert_eq!(geometry.crop.unwrap(), PixelRect::new(5, 5, 10, 20));
        Ok(())
    }

    #[test]
    fn explicit_crop_outside_frame_fails() -> Result<(), GeometryError> {
        let sampler = Crop::new(50, 50, 60, 60)?;
        let err = sampler
            .sample(FrameSize {
                width: 10,
                height: 10,
            })
            .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidCropSize { .. }));
        Ok(())
    }

    #[test]
    fn invalid_windows_fail_at_construction() {
        assert!(Crop::new(4, 0, 4, 10).is_err());
        assert!(Crop::new(-1, 0, 4, 10).is_err());
        assert!(RandomCrop::new(0, 3).is_err());
        assert!(CenterCrop::new(3, 0).is_err());
    }
}
