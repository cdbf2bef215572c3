use augmenta_geom::bbox::union_of_boxes;
use augmenta_geom::{FrameSize, Geometry, GeometryError, NormalizedRect, PixelRect};
use rand::Rng;

use crate::crop::random_crop_rect;
use crate::interpolation::InterpolationMode;

/// Crop a random part of the frame without losing any bounding box.
///
/// The union of the current boxes, eroded by `erosion_rate`, must stay
/// fully inside the sampled window. The window is grown from that union by
/// independent random fractions of the remaining margin on each side, then
/// pixelized with outward rounding so containment holds for every draw.
/// With no boxes present the sampler degrades to a random crop with a
/// height drawn from `[rows * (1 - erosion_rate), rows]` that preserves the
/// frame's aspect ratio.
#[derive(Clone, Debug)]
pub struct BBoxSafeRandomCrop {
    erosion_rate: f64,
}

impl BBoxSafeRandomCrop {
    /// Create a sampler with the given erosion rate in `[0, 1)`.
    pub fn new(erosion_rate: f64) -> Result<Self, GeometryError> {
        if !(0.0..1.0).contains(&erosion_rate) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "erosion_rate must lie in [0, 1), got {erosion_rate}"
            )));
        }
        Ok(Self { erosion_rate })
    }

    /// Sample a box-preserving window for `frame`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        frame: FrameSize,
        boxes: &[NormalizedRect],
        rng: &mut R,
    ) -> Result<Geometry, GeometryError> {
        if frame.is_empty() {
            return Err(GeometryError::InvalidGeometry {
                width: frame.width,
                height: frame.height,
            });
        }

        let Some(union) = union_of_boxes(boxes, self.erosion_rate) else {
            log::trace!("no boxes supplied, sampling an aspect-preserving random crop");
            return self.sample_without_boxes(frame, rng);
        };

        // grow the union into a random larger window inside the unit square
        let x_min = union.x_min * rng.random::<f64>();
        let y_min = union.y_min * rng.random::<f64>();
        let x_max = union.x_max + (1.0 - union.x_max) * rng.random::<f64>();
        let y_max = union.y_max + (1.0 - union.y_max) * rng.random::<f64>();

        let cols = frame.width as f64;
        let rows = frame.height as f64;

        // outward rounding keeps the eroded union inside for every draw; a
        // union spanning a full axis yields the full dimension
        let mut px_min = (x_min * cols).floor().max(0.0) as i64;
        let mut px_max = (x_max * cols).ceil().min(cols) as i64;
        let mut py_min = (y_min * rows).floor().max(0.0) as i64;
        let mut py_max = (y_max * rows).ceil().min(rows) as i64;

        if px_max <= px_min {
            px_min = (px_max - 1).max(0);
            px_max = px_min + 1;
        }
        if py_max <= py_min {
            py_min = (py_max - 1).max(0);
            py_max = py_min + 1;
        }

        Ok(Geometry::from_crop(
            frame,
            PixelRect::new(px_min, py_min, px_max, py_max),
        ))
    }

    fn sample_without_boxes<R: Rng + ?Sized>(
        &self,
        frame: FrameSize,
        rng: &mut R,
    ) -> Result<Geometry, GeometryError> {
        let rows = frame.height;
        let erosive_h = ((rows as f64 * (1.0 - self.erosion_rate)) as usize).max(1);
        let crop_height = if erosive_h >= rows {
            rows
        } else {
            rng.random_range(erosive_h..=rows)
        };
        let crop = FrameSize {
            width: (((crop_height * frame.width) as f64 / rows as f64) as usize).max(1),
            height: crop_height,
        };

        let h_start = rng.random::<f64>();
        let w_start = rng.random::<f64>();
        Ok(Geometry::from_crop(
            frame,
            random_crop_rect(frame, crop, h_start, w_start),
        ))
    }
}

/// Crop a random part of the frame without losing any bounding box, then
/// rescale it to a fixed output size.
#[derive(Clone, Debug)]
pub struct RandomSizedBBoxSafeCrop {
    crop: BBoxSafeRandomCrop,
    height: usize,
    width: usize,
    interpolation: InterpolationMode,
}

impl RandomSizedBBoxSafeCrop {
    /// Create a sampler resizing the box-preserving window to
    /// `height` x `width`.
    pub fn new(height: usize, width: usize, erosion_rate: f64) -> Result<Self, GeometryError> {
        if height == 0 || width == 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "output size must be positive, got {height}x{width}"
            )));
        }
        Ok(Self {
            crop: BBoxSafeRandomCrop::new(erosion_rate)?,
            height,
            width,
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

    /// Sample a box-preserving window plus resize target for `frame`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        frame: FrameSize,
        boxes: &[NormalizedRect],
        rng: &mut R,
    ) -> Result<Geometry, GeometryError> {
        let mut geometry = self.crop.sample(frame, boxes, rng)?;
        geometry.resize = Some(FrameSize {
            width: self.width,
            height: self.height,
        });
        Ok(geometry)
    }
}

/// Crop near an externally supplied reference rectangle with a random shift
/// of each side.
///
/// Each side moves by up to `max_part_shift` of the reference extent on its
/// axis, independently and in either direction. The min edges are clamped to
/// zero; the max edges are left as sampled, and clipping against the frame
/// is the raster collaborator's job at apply time.
#[derive(Clone, Debug)]
pub struct RandomCropNearBBox {
    max_part_shift: (f64, f64),
    key: String,
}

impl RandomCropNearBBox {
    /// Create a sampler shifting by up to `max_part_shift`
    /// (height fraction, width fraction), looking up the reference rectangle
    /// under `key`.
    pub fn new(max_part_shift: (f64, f64), key: impl Into<String>) -> Result<Self, GeometryError> {
        let key = key.into();
        if !(0.0..=1.0).contains(&max_part_shift.0) || !(0.0..=1.0).contains(&max_part_shift.1) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "max_part_shift must lie in [0, 1], got {max_part_shift:?}"
            )));
        }
        if key.is_empty() {
            return Err(GeometryError::InvalidConfiguration(
                "reference rectangle key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            max_part_shift,
            key,
        })
    }

    /// Name under which the caller supplies the reference rectangle.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Sample a shifted window around `reference` for `frame`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        frame: FrameSize,
        reference: PixelRect,
        rng: &mut R,
    ) -> Result<Geometry, GeometryError> {
        let h_max_shift =
            (reference.height().max(0) as f64 * self.max_part_shift.0).round() as i64;
        let w_max_shift = (reference.width().max(0) as f64 * self.max_part_shift.1).round() as i64;

        let x_min = reference.x_min - rng.random_range(-w_max_shift..=w_max_shift);
        let x_max = reference.x_max + rng.random_range(-w_max_shift..=w_max_shift);
        let y_min = reference.y_min - rng.random_range(-h_max_shift..=h_max_shift);
        let y_max = reference.y_max + rng.random_range(-h_max_shift..=h_max_shift);

        Ok(Geometry::from_crop(
            frame,
            PixelRect::new(x_min.max(0), y_min.max(0), x_max, y_max),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{BBoxSafeRandomCrop, RandomCropNearBBox, RandomSizedBBoxSafeCrop};
    use augmenta_geom::bbox::union_of_boxes;
    use augmenta_geom::{FrameSize, GeometryError, NormalizedRect, PixelRect};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn window_always_contains_the_eroded_union() -> Result<(), GeometryError> {
        let sampler = BBoxSafeRandomCrop::new(0.2)?;
        let frame = FrameSize {
            width: 37,
            height: 23,
        };
        let boxes = [
            NormalizedRect::new(0.12, 0.3, 0.45, 0.61),
            NormalizedRect::new(0.4, 0.05, 0.7, 0.2),
        ];
        let union = union_of_boxes(&boxes, 0.2).unwrap();
        let mut rng = StdRng::seed_from_u64(41);

        for _ in 0..1000 {
            let geometry = sampler.sample(frame, &boxes, &mut rng)?;
            let crop = geometry.crop.unwrap();
            assert!(crop.is_valid_for(frame));

            let normalized = crop.to_normalized(frame)?;
            assert!(normalized.x_min <= union.x_min, "{normalized:?} vs {union:?}");
            assert!(normalized.y_min <= union.y_min, "{normalized:?} vs {union:?}");
            assert!(normalized.x_max >= union.x_max, "{normalized:?} vs {union:?}");
            assert!(normalized.y_max >= union.y_max, "{normalized:?} vs {union:?}");
        }
        Ok(())
    }

    #[test]
    fn full_axis_union_takes_the_whole_dimension() -> Result<(), GeometryError> {
        let sampler = BBoxSafeRandomCrop::new(0.0)?;
        let frame = FrameSize {
            width: 16,
            height: 12,
        };
        let boxes = [NormalizedRect::new(0.0, 0.4, 1.0, 0.6)];
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..200 {
            let crop = sampler.sample(frame, &boxes, &mut rng)?.crop.unwrap();
            assert_eq!(crop.x_min, 0);
            assert_eq!(crop.x_max, 16);
        }
        Ok(())
    }

    #[test]
    fn empty_box_set_keeps_the_frame_aspect() -> Result<(), GeometryError> {
        let sampler = BBoxSafeRandomCrop::new(0.3)?;
        let frame = FrameSize {
            width: 40,
            height: 20,
        };
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..500 {
            let crop = sampler.sample(frame, &[], &mut rng)?.crop.unwrap();
            assert!(crop.is_valid_for(frame));
            let height = crop.height() as usize;
            assert!(height >= 14 && height <= 20);
            assert_eq!(crop.width() as usize, height * 2);
        }
        Ok(())
    }

    #[test]
    fn sized_variant_adds_the_resize_target() -> Result<(), GeometryError> {
        let sampler = RandomSizedBBoxSafeCrop::new(24, 24, 0.0)?;
        let frame = FrameSize {
            width: 30,
            height: 30,
        };
        let boxes = [NormalizedRect::new(0.2, 0.2, 0.5, 0.5)];
        let mut rng = StdRng::seed_from_u64(6);

        let geometry = sampler.sample(frame, &boxes, &mut rng)?;
        assert_eq!(geometry.resize, Some(FrameSize::from([24, 24])));
        assert!(geometry.crop.is_some());
        Ok(())
    }

    #[test]
    fn near_bbox_shifts_stay_bounded() -> Result<(), GeometryError> {
        let sampler = RandomCropNearBBox::new((0.3, 0.3), "cropping_bbox")?;
        let frame = FrameSize {
            width: 100,
            height: 100,
        };
        let reference = PixelRect::new(20, 30, 60, 70);
        let mut rng = StdRng::seed_from_u64(77);

        // 30% of the 40 px extents
        let shift = 12;
        for _ in 0..1000 {
            let crop = sampler.sample(frame, reference, &mut rng)?.crop.unwrap();
            assert!(crop.x_min >= 20 - shift && crop.x_min <= 20 + shift);
            assert!(crop.x_max >= 60 - shift && crop.x_max <= 60 + shift);
            assert!(crop.y_min >= 30 - shift && crop.y_min <= 30 + shift);
            assert!(crop.y_max >= 70 - shift && crop.y_max <= 70 + shift);
        }
        Ok(())
    }

    #[test]
    fn near_bbox_clamps_min_edges_only() -> Result<(), GeometryError> {
        let sampler = RandomCropNearBBox::new((1.0, 1.0), "box")?;
        let frame = FrameSize {
            width: 10,
            height: 10,
        };
        let reference = PixelRect::new(0, 0, 10, 10);
        let mut rng = StdRng::seed_from_u64(3);

        let mut exceeded_frame = false;
        for _ in 0..500 {
            let crop = sampler.sample(frame, reference, &mut rng)?.crop.unwrap();
            assert!(crop.x_min >= 0 && crop.y_min >= 0);
            exceeded_frame |= crop.x_max > 10 || crop.y_max > 10;
        }
        // max edges are deliberately not clipped here
        assert!(exceeded_frame);
        Ok(())
    }

    #[test]
    fn rates_are_validated_at_construction() {
        assert!(BBoxSafeRandomCrop::new(1.0).is_err());
        assert!(BBoxSafeRandomCrop::new(-0.1).is_err());
        assert!(RandomCropNearBBox::new((1.5, 0.1), "k").is_err());
        assert!(RandomCropNearBBox::new((0.1, 0.1), "").is_err());
        assert!(RandomSizedBBoxSafeCrop::new(0, 10, 0.1).is_err());
    }
}
