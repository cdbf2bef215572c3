/// Interpolation algorithm the raster collaborator uses when a sampled
/// geometry carries a resize target.
///
/// The sampling core never touches pixel buffers; the mode is passed through
/// unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Nearest neighbor (no interpolation); keeps mask labels intact.
    Nearest,
    /// Bilinear interpolation between the four adjacent pixels.
    Bilinear,
    /// Bicubic interpolation over a 4x4 neighborhood.
    Bicubic,
}
