//! Sampling-based soundness check for computed relaxations.
//!
//! Evaluates SPU at evenly spaced points in each interval and reports the
//! first point where a line crosses the curve by more than `tolerance`.

use crate::activation::spu;
use serde::{Deserialize, Serialize};
use spu_core::{BoundPair, Interval, Result, SpuError};

/// Which line crossed the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationSide {
    /// Lower line above SPU.
    Lower,
    /// Upper line below SPU.
    Upper,
}

/// A sample point where a relaxation failed to contain SPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundnessViolation {
    pub index: usize,
    pub interval: Interval,
    pub x: f64,
    pub spu_value: f64,
    pub line_value: f64,
    pub side: ViolationSide,
}

impl SoundnessViolation {
    /// Amount by which the line crossed the curve.
    pub fn amount(&self) -> f64 {
        match self.side {
            ViolationSide::Lower => self.line_value - self.spu_value,
            ViolationSide::Upper => self.spu_value - self.line_value,
        }
    }

    /// Human-readable description of the violation.
    pub fn explain(&self) -> String {
        match self.side {
            ViolationSide::Lower => format!(
                "Interval[{}] [{:.6}, {:.6}]: lower bound {:.12} > SPU({:.6}) = {:.12} (by {:.3e})",
                self.index,
                self.interval.lower,
                self.interval.upper,
                self.line_value,
                self.x,
                self.spu_value,
                self.amount()
            ),
            ViolationSide::Upper => format!(
                "Interval[{}] [{:.6}, {:.6}]: upper bound {:.12} < SPU({:.6}) = {:.12} (by {:.3e})",
                self.index,
                self.interval.lower,
                self.interval.upper,
                self.line_value,
                self.x,
                self.spu_value,
                self.amount()
            ),
        }
    }
}

/// Evenly spaced points covering `[l, u]` including both endpoints.
pub fn sample_points(interval: &Interval, num_samples: usize) -> Vec<f64> {
    let (l, u) = (interval.lower, interval.upper);
    if l == u || num_samples == 0 {
        return vec![l];
    }
    (0..=num_samples)
        .map(|i| {
            let t = i as f64 / num_samples as f64;
            (l + (u - l) * t).clamp(l, u)
        })
        .collect()
}

/// Check `pairs[i]` against SPU on `intervals[i]` at `num_samples + 1` points each.
///
/// Returns the first violation found, or `None` if every sample is contained.
/// The two slices must have the same length.
pub fn check_soundness(
    intervals: &[Interval],
    pairs: &[BoundPair],
    num_samples: usize,
    tolerance: f64,
) -> Result<Option<SoundnessViolation>> {
    if intervals.len() != pairs.len() {
        return Err(SpuError::ShapeMismatch {
            expected: intervals.len(),
            got: pairs.len(),
        });
    }
    Ok(find_violation(intervals, pairs, num_samples, tolerance))
}

fn find_violation(
    intervals: &[Interval],
    pairs: &[BoundPair],
    num_samples: usize,
    tolerance: f64,
) -> Option<SoundnessViolation> {
    for (index, (interval, pair)) in intervals.iter().zip(pairs.iter()).enumerate() {
        for x in sample_points(interval, num_samples) {
            let y = spu(x);
            let lo = pair.lower.eval(x);
            if lo - y > tolerance || lo.is_nan() {
                return Some(SoundnessViolation {
                    index,
                    interval: *interval,
                    x,
                    spu_value: y,
                    line_value: lo,
                    side: ViolationSide::Lower,
                });
            }
            let hi = pair.upper.eval(x);
            if y - hi > tolerance || hi.is_nan() {
                return Some(SoundnessViolation {
                    index,
                    interval: *interval,
                    x,
                    spu_value: y,
                    line_value: hi,
                    side: ViolationSide::Upper,
                });
            }
        }
    }
    None
}
