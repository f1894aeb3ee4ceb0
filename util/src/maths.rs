//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use num_traits::{Float, FloatConst};

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Map a value in the range [-pi, pi] to [0, 2pi]
pub fn map_pi_to_2pi<T>(value: T) -> T
where
    T: Float + FloatConst,
{
    let tau_t: T = T::PI() + T::PI();

    if value < T::zero() {
        tau_t + value
    } else {
        value
    }
}

/// Counter-clockwise angle from `from` to `to`, in the range [0, 2pi).
///
/// Zero length vectors have no direction, the angle to or from one is 0.
pub fn ccw_angle(from: &Vector2<f64>, to: &Vector2<f64>) -> f64 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.dot(to);

    rem_euclid(map_pi_to_2pi(cross.atan2(dot)), std::f64::consts::TAU)
}

/// Rotate a vector clockwise by a quarter turn, i.e. by -90 degrees.
pub fn rotate_cw_90<T>(v: &Vector2<T>) -> Vector2<T>
where
    T: Copy + std::ops::Neg<Output = T> + nalgebra::Scalar,
{
    Vector2::new(v.y, -v.x)
}

/// Cosine of the angle between `a` and `b`, or `None` if either has zero length.
pub fn cos_between(a: &Vector2<f64>, b: &Vector2<f64>) -> Option<f64> {
    let norms = a.norm() * b.norm();

    if norms == 0.0 {
        None
    } else {
        Some(a.dot(b) / norms)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_ccw_angle() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 1.0);

        assert!((ccw_angle(&x, &x) - 0.0).abs() < EPS);
        assert!((ccw_angle(&x, &y) - FRAC_PI_2).abs() < EPS);
        assert!((ccw_angle(&y, &x) - 3.0 * FRAC_PI_2).abs() < EPS);
        assert!((ccw_angle(&x, &-x) - PI).abs() < EPS);
        assert_eq!(ccw_angle(&Vector2::zeros(), &y), 0.0);
    }

    #[test]
    fn test_rotate_cw_90() {
        assert_eq!(rotate_cw_90(&Vector2::new(1, 0)), Vector2::new(0, -1));
        assert_eq!(rotate_cw_90(&Vector2::new(0, 1)), Vector2::new(1, 0));
    }

    #[test]
    fn test_cos_between() {
        assert_eq!(cos_between(&Vector2::new(1.0, 0.0), &Vector2::zeros()), None);
        let c = cos_between(&Vector2::new(1.0, 0.0), &Vector2::new(2.0, 0.0)).unwrap();
        assert!((c - 1.0).abs() < EPS);
    }
}
