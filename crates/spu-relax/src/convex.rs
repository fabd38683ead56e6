//! Relaxation on the convex branch (`l >= 0`), where SPU is `x² - 0.5`.
//!
//! Lower: tangent at `t`. Upper: chord through both endpoints.

use spu_core::{BoundPair, Interval, LinearBound};

/// Tangent to `x² - 0.5` at `t`.
#[inline]
pub fn square_tangent(t: f64) -> LinearBound {
    LinearBound::new(2.0 * t, -t * t - 0.5)
}

/// Linear relaxation for an interval with `l >= 0`.
///
/// With no tangent point the midpoint is used, in the closed form
/// `w = l + u, b = -(l + u)² / 4 - 0.5`. No division occurs, so `l == u`
/// is well defined: both lines pass through the single point.
pub fn convex_relaxation(interval: &Interval, tangent: Option<f64>) -> BoundPair {
    let (l, u) = (interval.lower, interval.upper);
    let upper = LinearBound::new(l + u, -l * u - 0.5);
    let lower = match tangent {
        Some(t) => square_tangent(t),
        None => {
            let w = l + u;
            LinearBound::new(w, -0.25 * w * w - 0.5)
        }
    };
    BoundPair::new(lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::spu;

    #[test]
    fn test_convex_secant_touches_endpoints() {
        let interval = Interval::new(0.5, 2.0);
        let pair = convex_relaxation(&interval, None);
        assert!((pair.upper.eval(0.5) - spu(0.5)).abs() < 1e-12);
        assert!((pair.upper.eval(2.0) - spu(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_convex_default_tangent_is_midpoint() {
        let interval = Interval::new(0.5, 2.0);
        let default = convex_relaxation(&interval, None);
        let explicit = convex_relaxation(&interval, Some(interval.midpoint()));
        assert!((default.lower.slope - explicit.lower.slope).abs() < 1e-12);
        assert!((default.lower.intercept - explicit.lower.intercept).abs() < 1e-12);
        assert!((default.lower.eval(1.25) - spu(1.25)).abs() < 1e-12);
    }

    #[test]
    fn test_convex_supplied_tangent_touches() {
        let pair = convex_relaxation(&Interval::new(0.0, 3.0), Some(2.5));
        assert_eq!(pair.lower.slope, 5.0);
        assert!((pair.lower.eval(2.5) - spu(2.5)).abs() < 1e-12);
    }

    #[test]
    fn test_convex_degenerate_point() {
        let pair = convex_relaxation(&Interval::point(2.0), None);
        assert!(pair.lower.is_finite() && pair.upper.is_finite());
        assert!((pair.lower.eval(2.0) - 3.5).abs() < 1e-12);
        assert!((pair.upper.eval(2.0) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_convex_zero_point() {
        let pair = convex_relaxation(&Interval::point(0.0), None);
        assert_eq!(pair.as_tuple(), (0.0, -0.5, 0.0, -0.5));
    }
}
