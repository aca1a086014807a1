//! Geometry helpers: collision predicates, steering and normalisation

pub mod collision;

pub use collision::*;

use nalgebra::Vector2;

use crate::common::Point2D;

/// Directions shorter than this cannot be normalised
pub const MIN_STEER_LENGTH: f64 = 1e-9;

/// Exact reciprocal square root
pub fn inv_sqrt(x: f64) -> f64 {
    1.0 / x.sqrt()
}

/// Approximate reciprocal square root: bit-level initial guess refined by one
/// Newton iteration. Relative error stays below 0.2% for positive finite input.
pub fn approx_inv_sqrt(x: f64) -> f64 {
    let xf = x as f32;
    if !(xf.is_finite() && xf > 0.0) {
        return inv_sqrt(x);
    }
    let guess = f32::from_bits(0x5f37_59df - (xf.to_bits() >> 1)) as f64;
    guess * (1.5 - 0.5 * x * guess * guess)
}

/// Unit vector from `from` towards `to`, or `None` when the points coincide
pub fn direction(from: Point2D, to: Point2D, fast: bool) -> Option<Vector2<f64>> {
    let d = to.to_vector() - from.to_vector();
    let len_sq = d.norm_squared();
    if len_sq < MIN_STEER_LENGTH * MIN_STEER_LENGTH {
        return None;
    }
    let scale = if fast { approx_inv_sqrt(len_sq) } else { inv_sqrt(len_sq) };
    Some(d * scale)
}

/// Point exactly `step` away from `from` along the direction to `toward`
pub fn steer(from: Point2D, toward: Point2D, step: f64) -> Option<Point2D> {
    direction(from, toward, false).map(|dir| Point2D::from(from.to_vector() + dir * step))
}
