pub mod bearing;
pub mod orientation;

pub use bearing::{bearing, in_opposite_arc};
pub use orientation::{orientation, orientation_difference, Orientation};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Wraps an angle in degrees into `[0, 360)`.
#[must_use]
pub(crate) fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
