use augmenta_geom::{FrameSize, Geometry, GeometryError, PadAmounts, Padding, PixelRect};
use rand::Rng;

use crate::interpolation::InterpolationMode;

/// Border handling for padded regions, in the raster collaborator's
/// vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderMode {
    /// Fill the border with a single constant value.
    Constant,
    /// Repeat the outermost row or column into the border.
    Replicate,
    /// Mirror at the boundary, starting with the edge pixel itself.
    Reflect,
    /// Mirror at the boundary, starting with the pixel next to the edge.
    Reflect101,
    /// Wrap content around from the opposite side.
    Wrap,
}

/// Per-side entry of a pixel crop/pad specification.
///
/// Negative amounts crop, positive amounts pad.
#[derive(Clone, Debug, PartialEq)]
pub enum SidePxSpec {
    /// Always exactly this amount.
    Constant(i64),
    /// Uniform draw from the half-open range `[min, max)`.
    Range(i64, i64),
    /// Uniform choice from the list.
    Choice(Vec<i64>),
}

impl SidePxSpec {
    fn validate(&self) -> Result<(), GeometryError> {
        match self {
            SidePxSpec::Constant(_) => Ok(()),
            SidePxSpec::Range(min, max) => check_px_range(*min, *max),
            SidePxSpec::Choice(values) if values.is_empty() => Err(
                GeometryError::InvalidConfiguration("empty pixel choice list".to_string()),
            ),
            SidePxSpec::Choice(_) => Ok(()),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        match self {
            SidePxSpec::Constant(v) => *v,
            SidePxSpec::Range(min, max) => rng.random_range(*min..*max),
            SidePxSpec::Choice(values) => values[rng.random_range(0..values.len())],
        }
    }
}

/// Pixel crop/pad amounts for all four sides.
#[derive(Clone, Debug, PartialEq)]
pub enum PxSpec {
    /// The same amount on every side.
    Constant(i64),
    /// One range for all sides; drawn once or per side depending on
    /// [`CropAndPad::with_sample_independently`].
    Range(i64, i64),
    /// Separate specifications in top, right, bottom, left order.
    PerSide([SidePxSpec; 4]),
}

impl PxSpec {
    fn validate(&self) -> Result<(), GeometryError> {
        match self {
            PxSpec::Constant(_) => Ok(()),
            PxSpec::Range(min, max) => check_px_range(*min, *max),
            PxSpec::PerSide(sides) => sides.iter().try_for_each(SidePxSpec::validate),
        }
    }
}

/// Per-side entry of a fractional crop/pad specification.
///
/// Fractions are relative to the frame extent of the side's axis; values
/// must be greater than `-1` so a single side can never crop a whole axis.
#[derive(Clone, Debug, PartialEq)]
pub enum SidePercentSpec {
    /// Always exactly this fraction.
    Constant(f64),
    /// Uniform draw from the closed range `[min, max]`.
    Range(f64, f64),
    /// Uniform choice from the list.
    Choice(Vec<f64>),
}

impl SidePercentSpec {
    fn validate(&self) -> Result<(), GeometryError> {
        match self {
            SidePercentSpec::Constant(v) => check_percent(*v),
            SidePercentSpec::Range(min, max) => check_percent_range(*min, *max),
            SidePercentSpec::Choice(values) => {
                if values.is_empty() {
                    return Err(GeometryError::InvalidConfiguration(
                        "empty percent choice list".to_string(),
                    ));
                }
                values.iter().try_for_each(|v| check_percent(*v))
            }
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            SidePercentSpec::Constant(v) => *v,
            SidePercentSpec::Range(min, max) => rng.random_range(*min..=*max),
            SidePercentSpec::Choice(values) => values[rng.random_range(0..values.len())],
        }
    }
}

/// Fractional crop/pad amounts for all four sides.
#[derive(Clone, Debug, PartialEq)]
pub enum PercentSpec {
    /// The same fraction on every side.
    Constant(f64),
    /// One range for all sides; drawn once or per side depending on
    /// [`CropAndPad::with_sample_independently`].
    Range(f64, f64),
    /// Separate specifications in top, right, bottom, left order.
    PerSide([SidePercentSpec; 4]),
}

impl PercentSpec {
    fn validate(&self) -> Result<(), GeometryError> {
        match self {
            PercentSpec::Constant(v) => check_percent(*v),
            PercentSpec::Range(min, max) => check_percent_range(*min, *max),
            PercentSpec::PerSide(sides) => sides.iter().try_for_each(SidePercentSpec::validate),
        }
    }
}

/// Constant fill value handed to the raster collaborator for padded pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum FillSpec {
    /// Always this value.
    Constant(f64),
    /// Uniform draw from the closed range `[min, max]`.
    Range(f64, f64),
    /// Uniform choice from the list.
    Choice(Vec<f64>),
}

impl FillSpec {
    fn validate(&self) -> Result<(), GeometryError> {
        match self {
            FillSpec::Constant(_) => Ok(()),
            FillSpec::Range(min, max) if min > max => Err(GeometryError::InvalidConfiguration(
                format!("empty fill range {min}..={max}"),
            )),
            FillSpec::Range(..) => Ok(()),
            FillSpec::Choice(values) if values.is_empty() => Err(
                GeometryError::InvalidConfiguration("empty fill choice list".to_string()),
            ),
            FillSpec::Choice(_) => Ok(()),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            FillSpec::Constant(v) => *v,
            FillSpec::Range(min, max) => rng.random_range(*min..=*max),
            FillSpec::Choice(values) => values[rng.random_range(0..values.len())],
        }
    }
}

fn check_px_range(min: i64, max: i64) -> Result<(), GeometryError> {
    if min >= max {
        return Err(GeometryError::InvalidConfiguration(format!(
            "empty pixel range {min}..{max}"
        )));
    }
    Ok(())
}

fn check_percent(value: f64) -> Result<(), GeometryError> {
    if value <= -1.0 {
        return Err(GeometryError::InvalidConfiguration(format!(
            "percent amount must be greater than -1, got {value}"
        )));
    }
    Ok(())
}

fn check_percent_range(min: f64, max: f64) -> Result<(), GeometryError> {
    if min > max {
        return Err(GeometryError::InvalidConfiguration(format!(
            "empty percent range {min}..={max}"
        )));
    }
    check_percent(min)
}

#[derive(Clone, Debug)]
enum AmountSpec {
    Px(PxSpec),
    Percent(PercentSpec),
}

/// Crop and pad the frame by per-side pixel amounts or frame fractions.
///
/// Negative amounts crop, positive amounts pad; the resolved geometry keeps
/// the two disjoint, so no side is ever cropped and padded at once. The
/// cropped result never drops below one pixel per axis: opposing crop
/// amounts that would collapse an axis are rebalanced away first. With
/// `keep_size` (the default) the descriptor carries a resize back to the
/// source frame.
///
/// # Examples
///
/// ```
/// use augmenta_crops::{CropAndPad, PxSpec};
/// use augmenta_geom::{FrameSize, PixelRect};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let unifier = CropAndPad::new(Some(PxSpec::Constant(-2)), None)?
///     .with_keep_size(false);
/// let mut rng = StdRng::seed_from_u64(0);
///
/// let geometry = unifier.sample(FrameSize { width: 10, height: 10 }, &mut rng)?;
/// assert_eq!(geometry.crop, Some(PixelRect::new(2, 2, 8, 8)));
/// assert!(geometry.pad.is_none());
/// # Ok::<(), augmenta_geom::GeometryError>(())
/// ```
#[derive(Clone, Debug)]
pub struct CropAndPad {
    spec: AmountSpec,
    border_mode: BorderMode,
    fill: FillSpec,
    fill_mask: FillSpec,
    keep_size: bool,
    sample_independently: bool,
    interpolation: InterpolationMode,
}

impl CropAndPad {
    /// Build a unifier from per-side amount specifications.
    ///
    /// # Errors
    ///
    /// Exactly one of `px` / `percent` must be given; anything else is an
    /// [`GeometryError::InvalidConfiguration`], as are empty ranges or
    /// choice lists.
    pub fn new(px: Option<PxSpec>, percent: Option<PercentSpec>) -> Result<Self, GeometryError> {
        let spec = match (px, percent) {
            (Some(px), None) => {
                px.validate()?;
                AmountSpec::Px(px)
            }
            (None, Some(percent)) => {
                percent.validate()?;
                AmountSpec::Percent(percent)
            }
            (None, None) => {
                return Err(GeometryError::InvalidConfiguration(
                    "neither px nor percent amounts are set".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(GeometryError::InvalidConfiguration(
                    "only one of px and percent amounts may be set".to_string(),
                ))
            }
        };
        Ok(Self {
            spec,
            border_mode: BorderMode::Constant,
            fill: FillSpec::Constant(0.0),
            fill_mask: FillSpec::Constant(0.0),
            keep_size: true,
            sample_independently: true,
            interpolation: InterpolationMode::Bilinear,
        })
    }

    /// Border handling for padded regions.
    pub fn with_border_mode(mut self, border_mode: BorderMode) -> Self {
        self.border_mode = border_mode;
        self
    }

    /// Fill value specification for padded image pixels.
    pub fn with_fill(mut self, fill: FillSpec) -> Result<Self, GeometryError> {
        fill.validate()?;
        self.fill = fill;
        Ok(self)
    }

    /// Fill value specification for padded mask pixels.
    pub fn with_fill_mask(mut self, fill_mask: FillSpec) -> Result<Self, GeometryError> {
        fill_mask.validate()?;
        self.fill_mask = fill_mask;
        Ok(self)
    }

    /// Whether the result is resized back to the source frame.
    pub fn with_keep_size(mut self, keep_size: bool) -> Self {
        self.keep_size = keep_size;
        self
    }

    /// Whether a shared `Range` draws once per side instead of once per
    /// sample.
    pub fn with_sample_independently(mut self, sample_independently: bool) -> Self {
        self.sample_independently = sample_independently;
        self
    }

    /// Interpolation for the keep-size resize step.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Border handling the raster collaborator should use.
    pub fn border_mode(&self) -> BorderMode {
        self.border_mode
    }

    /// Interpolation the raster collaborator should use.
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Resolve the per-side amounts into a disjoint crop window and pad
    /// amounts for `frame`.
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

        // top, right, bottom, left
        let amounts: [i64; 4] = match &self.spec {
            AmountSpec::Px(px) => self.sample_px(px, rng),
            AmountSpec::Percent(percent) => {
                let fractions = self.sample_percent(percent, rng);
                [
                    (fractions[0] * frame.height as f64) as i64,
                    (fractions[1] * frame.width as f64) as i64,
                    (fractions[2] * frame.height as f64) as i64,
                    (fractions[3] * frame.width as f64) as i64,
                ]
            }
        };

        let pad_amounts = PadAmounts {
            top: amounts[0].max(0) as usize,
            right: amounts[1].max(0) as usize,
            bottom: amounts[2].max(0) as usize,
            left: amounts[3].max(0) as usize,
        };

        let crop_amounts = prevent_zero(
            [
                (-amounts[0]).max(0),
                (-amounts[1]).max(0),
                (-amounts[2]).max(0),
                (-amounts[3]).max(0),
            ],
            frame,
        );
        let [top, right, bottom, left] = crop_amounts;
        let window = PixelRect::new(
            left,
            top,
            frame.width as i64 - right,
            frame.height as i64 - bottom,
        );
        let crop = (window.width() != frame.width as i64
            || window.height() != frame.height as i64)
            .then_some(window);

        let pad = (!pad_amounts.is_zero()).then(|| Padding {
            amounts: pad_amounts,
            fill: self.fill.sample(rng),
            fill_mask: self.fill_mask.sample(rng),
        });

        let mut geometry = Geometry {
            frame,
            crop,
            pad,
            resize: None,
        };
        if self.keep_size && geometry.padded_size() != frame {
            geometry.resize = Some(frame);
        }
        Ok(geometry)
    }

    fn sample_px<R: Rng + ?Sized>(&self, px: &PxSpec, rng: &mut R) -> [i64; 4] {
        match px {
            PxSpec::Constant(v) => [*v; 4],
            PxSpec::Range(min, max) => {
                if self.sample_independently {
                    [
                        rng.random_range(*min..*max),
                        rng.random_range(*min..*max),
                        rng.random_range(*min..*max),
                        rng.random_range(*min..*max),
                    ]
                } else {
                    [rng.random_range(*min..*max); 4]
                }
            }
            PxSpec::PerSide(sides) => {
                let mut amounts = [0i64; 4];
                for (amount, side) in amounts.iter_mut().zip(sides.iter()) {
                    *amount = side.sample(rng);
                }
                amounts
            }
        }
    }

    fn sample_percent<R: Rng + ?Sized>(&self, percent: &PercentSpec, rng: &mut R) -> [f64; 4] {
        match percent {
            PercentSpec::Constant(v) => [*v; 4],
            PercentSpec::Range(min, max) => {
                if self.sample_independently {
                    [
                        rng.random_range(*min..=*max),
                        rng.random_range(*min..=*max),
                        rng.random_range(*min..=*max),
                        rng.random_range(*min..=*max),
                    ]
                } else {
                    [rng.random_range(*min..=*max); 4]
                }
            }
            PercentSpec::PerSide(sides) => {
                let mut fractions = [0f64; 4];
                for (fraction, side) in fractions.iter_mut().zip(sides.iter()) {
                    *fraction = side.sample(rng);
                }
                fractions
            }
        }
    }
}

/// Shrink opposing crop amounts on any axis whose remaining extent would
/// fall below one pixel.
///
/// Amounts are in top, right, bottom, left order and non-negative.
fn prevent_zero(crop: [i64; 4], frame: FrameSize) -> [i64; 4] {
    let [mut top, mut right, mut bottom, mut left] = crop;

    let remaining_height = frame.height as i64 - (top + bottom);
    if remaining_height < 1 {
        log::debug!(
            "vertical crop {top}+{bottom} px collapses frame height {}, rebalancing",
            frame.height
        );
        (top, bottom) = rebalance(top, bottom);
    }
    let remaining_width = frame.width as i64 - (left + right);
    if remaining_width < 1 {
        log::debug!(
            "horizontal crop {left}+{right} px collapses frame width {}, rebalancing",
            frame.width
        );
        (left, right) = rebalance(left, right);
    }

    [top.max(0), right.max(0), bottom.max(0), left.max(0)]
}

/// Give back `combined + 1` pixels of crop, split as evenly as possible with
/// the extra unit on the first side; a side never regains more than it
/// cropped, the deficit moves to the opposite side.
fn rebalance(side1: i64, side2: i64) -> (i64, i64) {
    let regain = (side1 + side2).abs() + 1;
    let mut regain1 = regain / 2;
    let mut regain2 = regain / 2;
    if regain1 + regain2 < regain {
        regain1 += 1;
    }

    if regain1 > side1 {
        let diff = regain1 - side1;
        regain1 = side1;
        regain2 += diff;
    } else if regain2 > side2 {
        let diff = regain2 - side2;
        regain2 = side2;
        regain1 += diff;
    }

    (side1 - regain1, side2 - regain2)
}
