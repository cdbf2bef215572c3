use crate::rect::NormalizedRect;

/// Union of a set of normalized boxes, each eroded by `erosion_rate`.
///
/// Erosion shrinks every box by `erosion_rate` of its own extent on each
/// side before the min/max fold, so the result is the smallest rectangle
/// that must stay fully visible when the boxes are allowed to lose that
/// fraction. Returns `None` for an empty set.
///
/// # Examples
///
/// ```
/// use augmenta_geom::bbox::union_of_boxes;
/// use augmenta_geom::NormalizedRect;
///
/// let boxes = [
///     NormalizedRect::new(0.1, 0.2, 0.3, 0.4),
///     NormalizedRect::new(0.5, 0.1, 0.9, 0.3),
/// ];
/// let union = union_of_boxes(&boxes, 0.0).unwrap();
/// assert_eq!((union.x_min, union.y_min, union.x_max, union.y_max), (0.1, 0.1, 0.9, 0.4));
/// ```
pub fn union_of_boxes(boxes: &[NormalizedRect], erosion_rate: f64) -> Option<NormalizedRect> {
    let mut union: Option<NormalizedRect> = None;
    for b in boxes {
        let w = b.width();
        let h = b.height();
        let eroded = NormalizedRect {
            x_min: b.x_min + erosion_rate * w,
            y_min: b.y_min + erosion_rate * h,
            x_max: b.x_max - erosion_rate * w,
            y_max: b.y_max - erosion_rate * h,
        };
        union = Some(match union {
            None => eroded,
            Some(u) => NormalizedRect {
                x_min: u.x_min.min(eroded.x_min),
                y_min: u.y_min.min(eroded.y_min),
                x_max: u.x_max.max(eroded.x_max),
                y_max: u.y_max.max(eroded.y_max),
            },
        });
    }
    union
}
