/// A keypoint in pixel coordinates.
///
/// Only `x` and `y` participate in crop/pad mapping; `scale` is additionally
/// multiplied by the axis factors of a resize, and `angle` is passed through
/// untouched. Auxiliary per-point data stays with the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels.
    pub y: f64,
    /// Orientation in radians; convention is up to the caller.
    pub angle: f64,
    /// Size of the local region the point describes.
    pub scale: f64,
}

impl Keypoint {
    /// Create a keypoint.
    pub fn new(x: f64, y: f64, angle: f64, scale: f64) -> Self {
        Self {
            x,
            y,
            angle,
            scale,
        }
    }
}
