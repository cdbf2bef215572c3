//! Coordinate remapping of boxes and keypoints under a sampled geometry.
//!
//! The mappers only translate and scale; they never filter entities that
//! leave the visible window, and they never clamp. Visibility policy belongs
//! to the surrounding pipeline, which can use [`NormalizedRect::clamp`] to
//! collapse out-of-window boxes to zero-area boxes on the border.
//!
//! The composition order is fixed: translate by the crop origin, then
//! translate by the pad offsets, then scale by the resize factors. Reversing
//! the order produces different, incorrect results.

use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::keypoint::Keypoint;
use crate::rect::NormalizedRect;

/// Remap a normalized bounding box through a sampled geometry.
///
/// The box is denormalized against the source frame, translated by the crop
/// origin and the pad offsets, and renormalized against the crop+pad result
/// size. Resizing never changes normalized coordinates.
///
/// # Errors
///
/// Fails with [`GeometryError::InvalidGeometry`] when the source frame or
/// the crop+pad result has a zero extent.
pub fn remap_bbox(geometry: &Geometry, bbox: &NormalizedRect) -> Result<NormalizedRect, GeometryError> {
    let src = geometry.frame;
    if src.is_empty() {
        return Err(GeometryError::InvalidGeometry {
            width: src.width,
            height: src.height,
        });
    }

    let mut x_min = bbox.x_min * src.width as f64;
    let mut y_min = bbox.y_min * src.height as f64;
    let mut x_max = bbox.x_max * src.width as f64;
    let mut y_max = bbox.y_max * src.height as f64;

    if let Some(crop) = geometry.crop {
        x_min -= crop.x_min as f64;
        x_max -= crop.x_min as f64;
        y_min -= crop.y_min as f64;
        y_max -= crop.y_min as f64;
    }
    if let Some(pad) = geometry.pad {
        x_min += pad.amounts.left as f64;
        x_max += pad.amounts.left as f64;
        y_min += pad.amounts.top as f64;
        y_max += pad.amounts.top as f64;
    }

    let out = geometry.padded_size();
    if out.is_empty() {
        return Err(GeometryError::InvalidGeometry {
            width: out.width,
            height: out.height,
        });
    }
    Ok(NormalizedRect {
        x_min: x_min / out.width as f64,
        y_min: y_min / out.height as f64,
        x_max: x_max / out.width as f64,
        y_max: y_max / out.height as f64,
    })
}

/// Remap a keypoint through a sampled geometry.
///
/// `x`/`y` are translated by the crop origin and pad offsets, then scaled by
/// the per-axis resize factors. `scale` is multiplied by both axis factors;
/// `angle` is passed through unchanged, leaving the orientation convention
/// to the caller.
///
/// # Errors
///
/// Fails with [`GeometryError::InvalidGeometry`] when a resize is requested
/// from a zero-extent intermediate frame.
pub fn remap_keypoint(geometry: &Geometry, keypoint: &Keypoint) -> Result<Keypoint, GeometryError> {
    let mut x = keypoint.x;
    let mut y = keypoint.y;
    let mut scale = keypoint.scale;

    if let Some(crop) = geometry.crop {
        x -= crop.x_min as f64;
        y -= crop.y_min as f64;
    }
    if let Some(pad) = geometry.pad {
        x += pad.amounts.left as f64;
        y += pad.amounts.top as f64;
    }

    if let Some(target) = geometry.resize {
        let from = geometry.padded_size();
        if from.is_empty() {
            return Err(GeometryError::InvalidGeometry {
                width: from.width,
                height: from.height,
            });
        }
        let scale_x = target.width as f64 / from.width as f64;
        let scale_y = target.height as f64 / from.height as f64;
        x *= scale_x;
        y *= scale_y;
        scale *= scale_x * scale_y;
    }

    Ok(Keypoint {
        x,
        y,
        angle: keypoint.angle,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::{remap_bbox, remap_keypoint};
    use crate::error::GeometryError;
    use crate::frame::FrameSize;
    use crate::geometry::{Geometry, PadAmounts, Padding};
    use crate::keypoint::Keypoint;
    use crate::rect::{NormalizedRect, PixelRect};
    use approx::assert_abs_diff_eq;

    #[test]
    fn crop_translates_boxes() -> Result<(), GeometryError> {
        let frame = FrameSize {
            width: 10,
            height: 10,
        };
        let geometry = Geometry::from_crop(frame, PixelRect::new(2, 2, 8, 8));

        let bbox = NormalizedRect::new(0.3, 0.3, 0.5, 0.5);
        let mapped = remap_bbox(&geometry, &bbox)?;

        // (3, 3)..(5, 5) px shifted to (1, 1)..(3, 3) in the 6x6 window
        assert_abs_diff_eq!(mapped.x_min, 1.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mapped.y_min, 1.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mapped.x_max, 3.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mapped.y_max, 3.0 / 6.0, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn pad_shifts_and_renormalizes() -> Result<(), GeometryError> {
        let frame = FrameSize {
            width: 8,
            height: 4,
        };
        let geometry = Geometry {
            frame,
            crop: None,
            pad: Some(Padding {
                amounts: PadAmounts {
                    top: 2,
                    right: 0,
                    bottom: 0,
                    left: 2,
                },
                fill: 0.0,
                fill_mask: 0.0,
            }),
            resize: None,
        };

        let mapped = remap_bbox(&geometry, &NormalizedRect::new(0.0, 0.0, 1.0, 1.0))?;
        assert_abs_diff_eq!(mapped.x_min, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(mapped.y_min, 2.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mapped.x_max, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mapped.y_max, 1.0, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn resize_leaves_normalized_boxes_alone() -> Result<(), GeometryError> {
        let frame = FrameSize {
            width: 10,
            height: 10,
        };
        let geometry = Geometry {
            frame,
            crop: None,
            pad: None,
            resize: Some(FrameSize::from([5, 20])),
        };

        let bbox = NormalizedRect::new(0.1, 0.2, 0.4, 0.9);
        assert_eq!(remap_bbox(&geometry, &bbox)?, bbox);

        Ok(())
    }

    #[test]
    fn keypoint_crop_then_resize_order() -> Result<(), GeometryError> {
        let frame = FrameSize {
            width: 10,
            height: 10,
        };
        let geometry = Geometry {
            frame,
            crop: Some(PixelRect::new(2, 4, 6, 8)),
            pad: None,
            resize: Some(FrameSize::from([8, 2])),
        };

        // crop origin maps to the output origin, crop corner to the output corner
        let origin = remap_keypoint(&geometry, &Keypoint::new(2.0, 4.0, 0.0, 1.0))?;
        assert_abs_diff_eq!(origin.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(origin.y, 0.0, epsilon = 1e-12);

        let corner = remap_keypoint(&geometry, &Keypoint::new(6.0, 8.0, 0.5, 1.0))?;
        assert_abs_diff_eq!(corner.x, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(corner.y, 2.0, epsilon = 1e-12);
        // scale picks up both axis factors, angle is untouched
        assert_abs_diff_eq!(corner.scale, (8.0 / 4.0) * (2.0 / 4.0), epsilon = 1e-12);
        assert_abs_diff_eq!(corner.angle, 0.5, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn crop_round_trip_restores_coordinates() -> Result<(), GeometryError> {
        let frame = FrameSize {
            width: 17,
            height: 11,
        };
        let crop = PixelRect::new(3, 1, 15, 9);
        let geometry = Geometry::from_crop(frame, crop);

        let kp = Keypoint::new(7.0, 5.0, 1.25, 2.0);
        let mapped = remap_keypoint(&geometry, &kp)?;
        let restored = Keypoint::new(
            mapped.x + crop.x_min as f64,
            mapped.y + crop.y_min as f64,
            mapped.angle,
            mapped.scale,
        );
        assert_eq!(restored, kp);

        Ok(())
    }
}
