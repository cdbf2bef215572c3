use std::collections::HashMap;
use std::fmt;

use augmenta_geom::{Mask, MaskValue, NormalizedRect, PixelRect};

/// A run-time dependency a sampler declares before sampling.
///
/// The caller checks the declared set against the [`Targets`] it can supply
/// for the sample; sampling with missing data fails with
/// [`augmenta_geom::GeometryError::MissingTarget`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetKey {
    /// One or more segmentation masks.
    Mask,
    /// The current bounding-box set.
    Boxes,
    /// A reference rectangle supplied under a configurable name.
    Rect(String),
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKey::Mask => write!(f, "mask"),
            TargetKey::Boxes => write!(f, "bboxes"),
            TargetKey::Rect(key) => write!(f, "{key}"),
        }
    }
}

/// Run-time data for one sample, handed to [`crate::CropSampler::sample`].
///
/// Holds borrowed views only; the samplers never mutate or retain target
/// data.
#[derive(Clone, Debug)]
pub struct Targets<'a, T: MaskValue = u8> {
    masks: Vec<&'a Mask<T>>,
    boxes: Option<&'a [NormalizedRect]>,
    rects: HashMap<String, PixelRect>,
}

impl<T: MaskValue> Default for Targets<'_, T> {
    fn default() -> Self {
        Self {
            masks: Vec::new(),
            boxes: None,
            rects: HashMap::new(),
        }
    }
}

impl<'a, T: MaskValue> Targets<'a, T> {
    /// An empty target set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mask; may be called repeatedly for multi-mask samples.
    pub fn with_mask(mut self, mask: &'a Mask<T>) -> Self {
        self.masks.push(mask);
        self
    }

    /// Set the current bounding-box set (possibly empty).
    pub fn with_boxes(mut self, boxes: &'a [NormalizedRect]) -> Self {
        self.boxes = Some(boxes);
        self
    }

    /// Add a named reference rectangle.
    pub fn with_rect(mut self, key: impl Into<String>, rect: PixelRect) -> Self {
        self.rects.insert(key.into(), rect);
        self
    }

    /// Masks supplied for this sample.
    pub fn masks(&self) -> &[&'a Mask<T>] {
        &self.masks
    }

    /// Bounding boxes supplied for this sample, if any.
    pub fn boxes(&self) -> Option<&'a [NormalizedRect]> {
        self.boxes
    }

    /// Reference rectangle stored under `key`, if any.
    pub fn rect(&self, key: &str) -> Option<PixelRect> {
        self.rects.get(key).copied()
    }

    /// Whether the data for `key` is present.
    pub fn provides(&self, key: &TargetKey) -> bool {
        match key {
            TargetKey::Mask => !self.masks.is_empty(),
            TargetKey::Boxes => self.boxes.is_some(),
            TargetKey::Rect(name) => self.rects.contains_key(name),
        }
    }
}
