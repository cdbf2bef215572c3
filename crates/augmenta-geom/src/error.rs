/// An error type for geometry construction, sampling and remapping.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Contradictory or out-of-domain construction parameters.
    ///
    /// Raised eagerly when a sampler is built, never deferred to sample time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The requested crop does not fit into the available frame or mask.
    #[error("crop size ({crop_width}x{crop_height}) is larger than frame ({frame_width}x{frame_height})")]
    InvalidCropSize {
        /// Requested crop width in pixels.
        crop_width: usize,
        /// Requested crop height in pixels.
        crop_height: usize,
        /// Available frame width in pixels.
        frame_width: usize,
        /// Available frame height in pixels.
        frame_height: usize,
    },

    /// A sampler requires run-time data that was not supplied.
    #[error("missing required target `{0}`")]
    MissingTarget(String),

    /// A degenerate frame was encountered where a positive extent is needed.
    #[error("degenerate frame size ({width}x{height})")]
    InvalidGeometry {
        /// Frame width in pixels.
        width: usize,
        /// Frame height in pixels.
        height: usize,
    },

    /// Mask buffer length does not match its declared shape.
    #[error("mask data length ({got}) does not match the mask shape ({expected})")]
    InvalidMaskShape {
        /// Number of elements the shape requires.
        expected: usize,
        /// Number of elements in the buffer.
        got: usize,
    },
}
