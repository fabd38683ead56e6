//! Relaxation on the concave branch (`u <= 0`), where SPU is `-σ(x)`.
//!
//! Roles are swapped relative to the convex branch: the chord is the lower
//! bound and the tangent the upper bound.

use crate::activation::sigmoid;
use spu_core::{BoundPair, Interval, LinearBound};

/// Tangent to `-σ(x)` at `t`.
#[inline]
pub fn sigmoid_tangent(t: f64) -> LinearBound {
    let s = sigmoid(t);
    let w = s * (s - 1.0);
    LinearBound::new(w, -w * t - s)
}

/// Chord of `-σ(x)` through `l` and `u`.
///
/// When `l == u` the chord is undefined; the tangent at that point is
/// returned instead so no division by zero reaches the output.
pub fn sigmoid_chord(l: f64, u: f64) -> LinearBound {
    let u_sub_l = u - l;
    if u_sub_l == 0.0 {
        return sigmoid_tangent(l);
    }
    let s_l = sigmoid(l);
    let s_u = sigmoid(u);
    let w = (s_l - s_u) / u_sub_l;
    // Point-slope form of (l * s_u - u * s_l) / (u - l); stays anchored at
    // (l, -σ(l)) when u - l is tiny.
    LinearBound::new(w, -w * l - s_l)
}

/// Linear relaxation for an interval with `u <= 0`.
pub fn concave_relaxation(interval: &Interval, tangent: Option<f64>) -> BoundPair {
    let (l, u) = (interval.lower, interval.upper);
    let t = tangent.unwrap_or_else(|| interval.midpoint());
    BoundPair::new(sigmoid_chord(l, u), sigmoid_tangent(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::spu;

    #[test]
    fn test_concave_chord_touches_endpoints() {
        let pair = concave_relaxation(&Interval::new(-3.0, -0.5), None);
        assert!((pair.lower.eval(-3.0) - spu(-3.0)).abs() < 1e-12);
        assert!((pair.lower.eval(-0.5) - spu(-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_concave_tangent_touches_midpoint() {
        let interval = Interval::new(-3.0, -0.5);
        let pair = concave_relaxation(&interval, None);
        let t = interval.midpoint();
        assert!((pair.upper.eval(t) - spu(t)).abs() < 1e-12);
        assert!(pair.upper.slope < 0.0);
    }

    #[test]
    fn test_concave_degenerate_uses_tangent() {
        let pair = concave_relaxation(&Interval::point(-1.5), None);
        assert!(pair.lower.is_finite() && pair.upper.is_finite());
        assert_eq!(pair.lower, sigmoid_tangent(-1.5));
        assert!((pair.lower.eval(-1.5) - spu(-1.5)).abs() < 1e-12);
        assert!((pair.upper.eval(-1.5) - spu(-1.5)).abs() < 1e-12);
    }

    #[test]
    fn test_concave_upper_at_zero_endpoint() {
        let pair = concave_relaxation(&Interval::new(-2.0, 0.0), Some(0.0));
        assert_eq!(pair.upper.slope, -0.25);
        assert_eq!(pair.upper.intercept, -0.5);
    }
}
