//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value into `[min, max]`.
///
/// `NaN` is mapped to zero if zero lies in the range, otherwise to `min`, so that a corrupt input
/// always produces a usable value.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    if value.is_nan() {
        return clamp(T::zero(), min, max)
    }

    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Square a value while keeping its sign, i.e. `sign(x) * x^2`.
pub fn square_with_sign<T>(value: T) -> T
where
    T: Float
{
    (value * value).copysign(value)
}

/// Apply a deadband to a value in `[-1, 1]`.
///
/// Values whose magnitude is below `deadband` become zero. Values above it are rescaled so that
/// the output ramps continuously from 0 at the edge of the deadband to 1 at full scale.
pub fn apply_deadband<T>(value: T, deadband: T) -> T
where
    T: Float
{
    if value.abs() < deadband {
        return T::zero()
    }

    if deadband <= T::zero() || deadband >= T::one() {
        return value
    }

    lin_map((deadband, T::one()), (T::zero(), T::one()), value.abs()).copysign(value)
}

/// Scale a pair of values down by the same factor so that the larger magnitude is at most 1.
///
/// Pairs already within `[-1, 1]` are returned unchanged, so the ratio between the two values is
/// always preserved.
pub fn desaturate<T>(a: T, b: T) -> (T, T)
where
    T: Float
{
    let max_mag = a.abs().max(b.abs());

    if max_mag > T::one() {
        (a / max_mag, b / max_mag)
    }
    else {
        (a, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 10f64), (0f64, 1f64), 5f64), 0.5);
        assert_eq!(lin_map((-1f64, 1f64), (1f64, -1f64), 0.5f64), -0.5);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(1.5f64, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-1.5f64, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.25f64, -1.0, 1.0), 0.25);
        assert_eq!(clamp(f64::NAN, -1.0, 1.0), 0.0);
        assert_eq!(clamp(f64::NAN, 0.5, 1.0), 0.5);
        assert_eq!(clamp(f64::INFINITY, -1.0, 1.0), 1.0);
    }

    #[test]
    fn test_square_with_sign() {
        assert_eq!(square_with_sign(0.5f64), 0.25);
        assert_eq!(square_with_sign(-0.5f64), -0.25);
        assert_eq!(square_with_sign(0f64), 0.0);
    }

    #[test]
    fn test_apply_deadband() {
        assert_eq!(apply_deadband(0.01f64, 0.02), 0.0);
        assert_eq!(apply_deadband(1.0f64, 0.02), 1.0);
        assert_eq!(apply_deadband(-1.0f64, 0.02), -1.0);
        assert_eq!(apply_deadband(0.3f64, 0.0), 0.3);

        // Halfway between the deadband edge and full scale maps to half
        assert!((apply_deadband(0.55f64, 0.1) - 0.5).abs() < 1e-12);
        assert!((apply_deadband(-0.55f64, 0.1) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_desaturate() {
        assert_eq!(desaturate(0.5f64, -0.5), (0.5, -0.5));
        assert_eq!(desaturate(2.0f64, 0.0), (1.0, 0.0));
        assert_eq!(desaturate(-0.5f64, -2.0), (-0.25, -1.0));
    }
}
