//! Relaxation for intervals straddling zero (`l < 0 < u`).
//!
//! SPU changes curvature at 0, so no single tangent/chord pair works.
//! The effective tangent point `t` (midpoint by default) selects one of two
//! constructions:
//!
//! - [`MixedCase::UpperSplit`] (`t >= 0`): tangent on the square branch
//!   below, chord from `(l, -σ(l))` to `(u, u² - 0.5)` above. The upper
//!   line is only known to be sound for `t <= (l + u) / 2`.
//! - [`MixedCase::LowerSplit`] (`t < 0`): chord from `(l, -σ(l))` to
//!   `(0, -0.5)` below, and an upper line picked from three candidates.
//!
//! As `u` grows with `l` and `t` fixed, the enclosing upper line moves from
//! the tangent at `t`, to the line anchored at `l` with slope `σ(l)(1-σ(l))`,
//! to the chord through `l` and `u`. [`lower_split_upper`] walks that
//! sequence: first the tangent is tested at `u`, then the two remaining
//! candidates are compared by slope.

use crate::activation::sigmoid;
use crate::concave::sigmoid_tangent;
use crate::convex::square_tangent;
use crate::region::mixed_case;
use spu_core::{BoundPair, Interval, LinearBound, MixedCase};

/// Which upper line the lower-split selection settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperCandidate {
    /// Tangent to `-σ` at `t`; already above the square branch at `u`.
    TangentAtT,
    /// Chord from `(l, -σ(l))` to `(u, u² - 0.5)`.
    CrossChord,
    /// Line through `(l, -σ(l))` with slope `σ(l)(1 - σ(l))`.
    AnchoredAtL,
}

/// Chord from `(l, -σ(l))` on the sigmoid branch to `(u, u² - 0.5)` on the
/// square branch. Only called with `l < 0 < u`, so `u - l` is nonzero.
#[inline]
pub(crate) fn cross_chord(l: f64, u: f64, s_l: f64) -> LinearBound {
    debug_assert!(l < u, "cross chord needs l < u, got [{}, {}]", l, u);
    let y_u = u * u - 0.5;
    let w = (y_u + s_l) / (u - l);
    // Equal to -(l * y_u + u * s_l) / (u - l).
    LinearBound::new(w, -w * l - s_l)
}

/// Line through `(l, -σ(l))` with slope `σ(l)(1 - σ(l))`.
#[inline]
fn anchored_at_l(l: f64, s_l: f64) -> LinearBound {
    let w = s_l * (1.0 - s_l);
    LinearBound::new(w, -w * l - s_l)
}

/// Upper line for the lower-split case, and which candidate was chosen.
///
/// The order of the two tests matters: the tangent at `t` is checked
/// against the square branch at `u` first, and only if it fails are the
/// remaining candidates compared by slope.
pub fn lower_split_upper(l: f64, u: f64, t: f64) -> (LinearBound, UpperCandidate) {
    let tangent = sigmoid_tangent(t);
    if u * u - 0.5 <= tangent.eval(u) {
        return (tangent, UpperCandidate::TangentAtT);
    }

    let s_l = sigmoid(l);
    let chord = cross_chord(l, u, s_l);
    let anchored = anchored_at_l(l, s_l);
    if chord.slope >= anchored.slope {
        (chord, UpperCandidate::CrossChord)
    } else {
        (anchored, UpperCandidate::AnchoredAtL)
    }
}

/// Relaxation for `l < 0 <= t < u`.
pub fn upper_split_relaxation(l: f64, u: f64, t: f64) -> BoundPair {
    BoundPair::new(square_tangent(t), cross_chord(l, u, sigmoid(l)))
}

/// Relaxation for `l < t < 0 < u`.
pub fn lower_split_relaxation(l: f64, u: f64, t: f64) -> BoundPair {
    // Chord of -σ from l to 0, where SPU(0) = -0.5. l is nonzero here.
    let s_l = sigmoid(l);
    let lower = LinearBound::new((0.5 - s_l) / l, -0.5);
    let (upper, _) = lower_split_upper(l, u, t);
    BoundPair::new(lower, upper)
}

/// Linear relaxation for an interval with `l < 0 < u`.
pub fn mixed_relaxation(interval: &Interval, tangent: Option<f64>) -> BoundPair {
    let (l, u) = (interval.lower, interval.upper);
    let t = tangent.unwrap_or_else(|| interval.midpoint());
    match mixed_case(t) {
        MixedCase::UpperSplit => upper_split_relaxation(l, u, t),
        MixedCase::LowerSplit => lower_split_relaxation(l, u, t),
    }
}

/// Whether an upper-split tangent point lies in the regime where the upper
/// line is known to be sound (`t <= (l + u) / 2`).
#[inline]
pub fn upper_split_tangent_verified(interval: &Interval, t: f64) -> bool {
    t <= interval.midpoint()
}
