use augmenta_geom::{FrameSize, Geometry, GeometryError, PixelRect};
use rand::Rng;

/// Crop by randomly cutting parts from the frame borders, without resizing.
///
/// Each border carries an independent fraction: up to `crop_left * width`
/// pixels are cut from the left, the right edge is drawn from
/// `[(1 - crop_right) * width, width]`, and likewise vertically. The lower
/// bound of each max-edge draw is floored at one past the min edge, so the
/// window can never collapse.
#[derive(Clone, Debug)]
pub struct RandomCropFromBorders {
    crop_left: f64,
    crop_right: f64,
    crop_top: f64,
    crop_bottom: f64,
}

impl RandomCropFromBorders {
    /// Create a sampler with per-border fractions, each in `[0, 1)`.
    pub fn new(
        crop_left: f64,
        crop_right: f64,
        crop_top: f64,
        crop_bottom: f64,
    ) -> Result<Self, GeometryError> {
        for (name, value) in [
            ("crop_left", crop_left),
            ("crop_right", crop_right),
            ("crop_top", crop_top),
            ("crop_bottom", crop_bottom),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(GeometryError::InvalidConfiguration(format!(
                    "{name} must lie in [0, 1), got {value}"
                )));
            }
        }
        Ok(Self {
            crop_left,
            crop_right,
            crop_top,
            crop_bottom,
        })
    }

    /// Sample a border-cut window for `frame`.
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

        let cols = frame.width as i64;
        let rows = frame.height as i64;

        let x_min = rng.random_range(0..=(self.crop_left * cols as f64) as i64);
        let x_lo = (x_min + 1).max(((1.0 - self.crop_right) * cols as f64) as i64);
        let x_max = rng.random_range(x_lo..=cols);

        let y_min = rng.random_range(0..=(self.crop_top * rows as f64) as i64);
        let y_lo = (y_min + 1).max(((1.0 - self.crop_bottom) * rows as f64) as i64);
        let y_max = rng.random_range(y_lo..=rows);

        Ok(Geometry::from_crop(
            frame,
            PixelRect::new(x_min, y_min, x_max, y_max),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::RandomCropFromBorders;
    use augmenta_geom::{FrameSize, GeometryError};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn window_respects_border_fractions() -> Result<(), GeometryError> {
        let sampler = RandomCropFromBorders::new(0.2, 0.3, 0.1, 0.4)?;
        let frame = FrameSize {
            width: 100,
            height: 50,
        };
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..1000 {
            let geometry = sampler.sample(frame, &mut rng)?;
            let crop = geometry.crop.unwrap();
            assert!(crop.is_valid_for(frame));
            assert!(crop.x_min <= 20);
            assert!(crop.x_max >= 70);
            assert!(crop.y_min <= 5);
            assert!(crop.y_max >= 30);
        }
        Ok(())
    }

    #[test]
    fn extreme_fractions_never_collapse_the_window() -> Result<(), GeometryError> {
        let sampler = RandomCropFromBorders::new(0.99, 0.99, 0.99, 0.99)?;
        let frame = FrameSize {
            width: 5,
            height: 5,
        };
        let mut rng = StdRng::seed_from_u64(23);

        for _ in 0..1000 {
            let crop = sampler.sample(frame, &mut rng)?.crop.unwrap();
            assert!(crop.width() >= 1 && crop.height() >= 1, "collapsed: {crop:?}");
            assert!(crop.is_valid_for(frame));
        }
        Ok(())
    }

    #[test]
    fn fractions_are_validated_at_construction() {
        assert!(RandomCropFromBorders::new(1.0, 0.0, 0.0, 0.0).is_err());
        assert!(RandomCropFromBorders::new(0.0, -0.1, 0.0, 0.0).is_err());
    }
}
