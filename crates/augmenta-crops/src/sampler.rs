use augmenta_geom::{FrameSize, Geometry, GeometryError, MaskValue};
use rand::Rng;

use crate::bbox::{BBoxSafeRandomCrop, RandomCropNearBBox, RandomSizedBBoxSafeCrop};
use crate::borders::RandomCropFromBorders;
use crate::crop::{CenterCrop, Crop, RandomCrop};
use crate::crop_and_pad::CropAndPad;
use crate::mask::CropNonEmptyMaskIfExists;
use crate::resized::{RandomResizedCrop, RandomSizedCrop};
use crate::targets::{TargetKey, Targets};

/// The closed set of crop/pad sampling strategies.
///
/// Each variant owns the immutable configuration of one strategy. Sampling
/// draws from the caller-supplied random source and produces one
/// [`Geometry`] descriptor per call; every target of that sample must then
/// be transformed through the same descriptor.
///
/// # Examples
///
/// ```
/// use augmenta_crops::{CropSampler, RandomCropNearBBox, TargetKey, Targets};
/// use augmenta_geom::{FrameSize, GeometryError, PixelRect};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let sampler: CropSampler =
///     RandomCropNearBBox::new((0.3, 0.3), "cropping_bbox")?.into();
/// assert_eq!(
///     sampler.required_targets(),
///     vec![TargetKey::Rect("cropping_bbox".to_string())]
/// );
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let frame = FrameSize { width: 100, height: 100 };
///
/// // without the declared rectangle the sample fails explicitly
/// let missing = sampler.sample(frame, &Targets::new(), &mut rng);
/// assert!(matches!(missing, Err(GeometryError::MissingTarget(_))));
///
/// let targets = Targets::new().with_rect("cropping_bbox", PixelRect::new(10, 10, 40, 40));
/// let geometry = sampler.sample(frame, &targets, &mut rng)?;
/// assert!(geometry.crop.is_some());
/// # Ok::<(), GeometryError>(())
/// ```
#[derive(Clone, Debug)]
pub enum CropSampler<T: MaskValue = u8> {
    /// Fixed-size crop at a random position.
    Random(RandomCrop),
    /// Fixed-size crop at the frame center.
    Center(CenterCrop),
    /// Explicitly given window, clamped to the frame.
    Fixed(Crop),
    /// Crop guided by mask foreground.
    NonEmptyMask(CropNonEmptyMaskIfExists<T>),
    /// Ranged-height crop with a resize target.
    RandomSized(RandomSizedCrop),
    /// Area/aspect constrained crop with a resize target.
    RandomResized(RandomResizedCrop),
    /// Crop cutting random parts off the borders.
    FromBorders(RandomCropFromBorders),
    /// Crop containing the eroded union of the current boxes.
    BboxSafe(BBoxSafeRandomCrop),
    /// Box-preserving crop with a resize target.
    SizedBboxSafe(RandomSizedBBoxSafeCrop),
    /// Crop near an externally supplied reference rectangle.
    NearBbox(RandomCropNearBBox),
    /// Per-side signed crop/pad resolution.
    CropAndPad(CropAndPad),
}

impl<T: MaskValue> CropSampler<T> {
    /// Run-time targets the strategy needs at sample time.
    ///
    /// Callers check this set against the data they can supply before
    /// invoking [`CropSampler::sample`].
    pub fn required_targets(&self) -> Vec<TargetKey> {
        match self {
            Self::NonEmptyMask(_) => vec![TargetKey::Mask],
            Self::BboxSafe(_) | Self::SizedBboxSafe(_) => vec![TargetKey::Boxes],
            Self::NearBbox(sampler) => vec![TargetKey::Rect(sampler.key().to_string())],
            _ => Vec::new(),
        }
    }

    /// Sample the geometry descriptor for one augmented sample.
    ///
    /// The mask-guided strategy derives the frame from the mask itself; all
    /// others use `frame` directly.
    ///
    /// # Errors
    ///
    /// Declared targets missing from `targets` surface as
    /// [`GeometryError::MissingTarget`]; size violations as
    /// [`GeometryError::InvalidCropSize`].
    pub fn sample<R: Rng + ?Sized>(
        &self,
        frame: FrameSize,
        targets: &Targets<'_, T>,
        rng: &mut R,
    ) -> Result<Geometry, GeometryError> {
        match self {
            Self::Random(sampler) => sampler.sample(frame, rng),
            Self::Center(sampler) => sampler.sample(frame),
            Self::Fixed(sampler) => sampler.sample(frame),
            Self::NonEmptyMask(sampler) => sampler.sample(targets.masks(), rng),
            Self::RandomSized(sampler) => sampler.sample(frame, rng),
            Self::RandomResized(sampler) => sampler.sample(frame, rng),
            Self::FromBorders(sampler) => sampler.sample(frame, rng),
            Self::BboxSafe(sampler) => {
                let boxes = targets
                    .boxes()
                    .ok_or_else(|| GeometryError::MissingTarget(TargetKey::Boxes.to_string()))?;
                sampler.sample(frame, boxes, rng)
            }
            Self::SizedBboxSafe(sampler) => {
                let boxes = targets
                    .boxes()
                    .ok_or_else(|| GeometryError::MissingTarget(TargetKey::Boxes.to_string()))?;
                sampler.sample(frame, boxes, rng)
            }
            Self::NearBbox(sampler) => {
                let reference = targets
                    .rect(sampler.key())
                    .ok_or_else(|| GeometryError::MissingTarget(sampler.key().to_string()))?;
                sampler.sample(frame, reference, rng)
            }
            Self::CropAndPad(sampler) => sampler.sample(frame, rng),
        }
    }
}

impl<T: MaskValue> From<RandomCrop> for CropSampler<T> {
    fn from(sampler: RandomCrop) -> Self {
        Self::Random(sampler)
    }
}

impl<T: MaskValue> From<CenterCrop> for CropSampler<T> {
    fn from(sampler: CenterCrop) -> Self {
        Self::Center(sampler)
    }
}

impl<T: MaskValue> From<Crop> for CropSampler<T> {
    fn from(sampler: Crop) -> Self {
        Self::Fixed(sampler)
    }
}

impl<T: MaskValue> From<CropNonEmptyMaskIfExists<T>> for CropSampler<T> {
    fn from(sampler: CropNonEmptyMaskIfExists<T>) -> Self {
        Self::NonEmptyMask(sampler)
    }
}

impl<T: MaskValue> From<RandomSizedCrop> for CropSampler<T> {
    fn from(sampler: RandomSizedCrop) -> Self {
        Self::RandomSized(sampler)
    }
}

impl<T: MaskValue> From<RandomResizedCrop> for CropSampler<T> {
    fn from(sampler: RandomResizedCrop) -> Self {
        Self::RandomResized(sampler)
    }
}

impl<T: MaskValue> From<RandomCropFromBorders> for CropSampler<T> {
    fn from(sampler: RandomCropFromBorders) -> Self {
        Self::FromBorders(sampler)
    }
}

impl<T: MaskValue> From<BBoxSafeRandomCrop> for CropSampler<T> {
    fn from(sampler: BBoxSafeRandomCrop) -> Self {
        Self::BboxSafe(sampler)
    }
}

impl<T: MaskValue> From<RandomSizedBBoxSafeCrop> for CropSampler<T> {
    fn from(sampler: RandomSizedBBoxSafeCrop) -> Self {
        Self::SizedBboxSafe(sampler)
    }
}

impl<T: MaskValue> From<RandomCropNearBBox> for CropSampler<T> {
    fn from(sampler: RandomCropNearBBox) -> Self {
        Self::NearBbox(sampler)
    }
}

impl<T: MaskValue> From<CropAndPad> for CropSampler<T> {
    fn from(sampler: CropAndPad) -> Self {
        Self::CropAndPad(sampler)
    }
}
