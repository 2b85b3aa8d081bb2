use super::Point2;

/// Axial trend of a segment in degrees.
///
/// `on` is measured clockwise from north (the +y axis) and folded into
/// `[0, 180)`, so a segment and its reverse share the same orientation.
/// `oe` is its complement, `180 - on`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Orientation from north, in `[0, 180)`.
    pub on: f64,
    /// Complementary orientation, `180 - on`.
    pub oe: f64,
}

impl Orientation {
    /// Builds an orientation from an already normalized `on` value.
    #[must_use]
    pub fn from_on(on: f64) -> Self {
        Self { on, oe: 180.0 - on }
    }
}

/// Computes the orientation of the segment from `start` to `end`.
///
/// The raw angle is `atan(dx / dy)`. A horizontal segment (`dy == 0`) has
/// no defined ratio and is pinned to 90 degrees (due east-west).
#[must_use]
pub fn orientation(start: &Point2, end: &Point2) -> Orientation {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dy == 0.0 {
        return Orientation::from_on(90.0);
    }

    let theta = (dx / dy).atan().to_degrees();
    let mut on = if theta < 0.0 { theta + 180.0 } else { theta };
    // A vanishing negative angle folds onto 180, which is the same axis as 0.
    if on >= 180.0 {
        on = 0.0;
    }
    Orientation::from_on(on)
}

/// Returns the acute difference between two orientations, in `[0, 90]`.
///
/// Orientations are periodic at 180 degrees, so differences above 90 are
/// folded to `180 - d`.
#[must_use]
pub fn orientation_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    if d > 90.0 {
        180.0 - d
    } else {
        d
    }
}
