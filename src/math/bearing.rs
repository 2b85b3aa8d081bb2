use std::cmp::Ordering;

use super::{wrap_degrees, Point2};

/// Computes the compass bearing of `target` as seen from `reference`.
///
/// Bearings are measured clockwise from north (the +y axis) and lie in
/// `[0, 360)`: east is 90, south 180, west 270. Returns `None` when the two
/// points coincide, since no direction exists.
#[must_use]
pub fn bearing(target: &Point2, reference: &Point2) -> Option<f64> {
    let dx = target.x - reference.x;
    let dy = target.y - reference.y;

    let rd = match (dx.partial_cmp(&0.0)?, dy.partial_cmp(&0.0)?) {
        (Ordering::Equal, Ordering::Equal) => return None,
        (Ordering::Equal, Ordering::Greater) => 0.0,
        (Ordering::Greater, Ordering::Equal) => 90.0,
        (Ordering::Equal, Ordering::Less) => 180.0,
        (Ordering::Less, Ordering::Equal) => 270.0,
        (Ordering::Greater, Ordering::Greater) => 90.0 - slope_angle(dx, dy),
        (Ordering::Greater, Ordering::Less) => 90.0 + slope_angle(dx, dy),
        (Ordering::Less, Ordering::Less) => 270.0 - slope_angle(dx, dy),
        (Ordering::Less, Ordering::Greater) => 270.0 + slope_angle(dx, dy),
    };

    Some(wrap_degrees(rd))
}

/// Angle of `|dy / dx|` above the horizontal, in degrees.
fn slope_angle(dx: f64, dy: f64) -> f64 {
    (dy / dx).abs().atan().to_degrees()
}

/// Returns whether `rd` points away from `reference` by at least 90 degrees.
///
/// The accepted arc is `[reference + 90, reference + 270]`, together with its
/// image shifted by one full turn, `[reference - 270, reference - 90]`.
#[must_use]
pub fn in_opposite_arc(rd: f64, reference: f64) -> bool {
    (rd >= reference + 90.0 && rd <= reference + 270.0)
        || (rd >= reference - 270.0 && rd <= reference - 90.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn axis_aligned_bearings() {
        let origin = p(0.0, 0.0);
        assert_abs_diff_eq!(bearing(&p(0.0, 5.0), &origin).unwrap(), 0.0);
        assert_abs_diff_eq!(bearing(&p(5.0, 0.0), &origin).unwrap(), 90.0);
        assert_abs_diff_eq!(bearing(&p(0.0, -5.0), &origin).unwrap(), 180.0);
        assert_abs_diff_eq!(bearing(&p(-5.0, 0.0), &origin).unwrap(), 270.0);
    }

    #[test]
    fn quadrant_bearings() {
        let origin = p(0.0, 0.0);
        assert_abs_diff_eq!(bearing(&p(1.0, 1.0), &origin).unwrap(), 45.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bearing(&p(1.0, -1.0), &origin).unwrap(), 135.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bearing(&p(-1.0, -1.0), &origin).unwrap(), 225.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bearing(&p(-1.0, 1.0), &origin).unwrap(), 315.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            bearing(&p(3.0_f64.sqrt(), 1.0), &origin).unwrap(),
            60.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn bearing_is_relative_to_reference() {
        let seed = p(100.0, 100.0);
        assert_abs_diff_eq!(bearing(&p(100.0, 50.0), &seed).unwrap(), 180.0);
        assert_abs_diff_eq!(bearing(&seed, &p(100.0, 50.0)).unwrap(), 0.0);
    }

    #[test]
    fn coincident_points_are_undefined() {
        assert_eq!(bearing(&p(3.0, 4.0), &p(3.0, 4.0)), None);
    }

    #[test]
    fn bearing_range() {
        let coords = [-7.0, -1e-12, 0.0, 1e-12, 2.0, 1e6];
        for &x in &coords {
            for &y in &coords {
                if let Some(rd) = bearing(&p(x, y), &p(0.0, 0.0)) {
                    assert!((0.0..360.0).contains(&rd), "x={x} y={y} rd={rd}");
                } else {
                    assert!(x == 0.0 && y == 0.0);
                }
            }
        }
    }

    #[test]
    fn opposite_arc_wraps_around() {
        assert!(in_opposite_arc(180.0, 0.0));
        assert!(in_opposite_arc(90.0, 0.0));
        assert!(in_opposite_arc(270.0, 0.0));
        assert!(!in_opposite_arc(45.0, 0.0));

        assert!(in_opposite_arc(100.0, 300.0));
        assert!(!in_opposite_arc(10.0, 300.0));
        assert!(in_opposite_arc(200.0, 300.0));
        assert!(!in_opposite_arc(280.0, 300.0));
        assert!(!in_opposite_arc(350.0, 300.0));
    }
}
