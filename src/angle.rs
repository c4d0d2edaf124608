//! Angle arithmetic that does not care about the range of its inputs.
//!
//! Headings accumulate without ever being normalized, so everything here goes through
//! `sin`/`cos`/`atan2` or a euclidean remainder.
use crate::geometry::Vec2;
use std::f64::consts::TAU;

/// Signed difference `a - b` wrapped into `(-period / 2, period / 2]`.
///
/// With `period = TAU` this is the shortest turn from `b` to `a`; with a world extent it is
/// the shortest displacement along one axis of a torus.
pub fn shortest_difference(a: f64, b: f64, period: f64) -> f64 {
    let half = period / 2.0;
    half - (half - (a - b)).rem_euclid(period)
}

/// Shortest signed turn from heading `b` to heading `a`, in `(-pi, pi]`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    shortest_difference(a, b, TAU)
}

/// Circular mean of `angles`: the direction of the sum of their unit vectors.
///
/// Returns `None` when there are no angles or they cancel out exactly.
pub fn circular_mean<It>(angles: It) -> Option<f64>
where
    It: IntoIterator<Item = f64>,
{
    let mut sum = Vec2::ZERO;
    for angle in angles {
        sum += Vec2::from_angle(angle);
    }
    if sum.is_zero() {
        return None;
    }
    Some(sum.angle())
}
