//! Region classification and batch partitioning.
//!
//! Each interval is classified once by the signs of its endpoints:
//! - `l >= 0` is [`Region::Convex`] (so `l == u == 0` lands here)
//! - `u <= 0` is [`Region::Concave`]
//! - otherwise [`Region::Mixed`], further split by the sign of the
//!   effective tangent point into [`MixedCase`].
//!
//! A [`RegionPartition`] holds the resulting index groups so each bounder
//! can run over its own group and scatter results back by index.

use spu_core::{Interval, MixedCase, Region, Result, SpuError};

/// Classify an interval by the signs of its endpoints.
#[inline]
pub fn classify(interval: &Interval) -> Region {
    if interval.lower >= 0.0 {
        Region::Convex
    } else if interval.upper <= 0.0 {
        Region::Concave
    } else {
        Region::Mixed
    }
}

/// Sub-case of a mixed interval given its effective (already defaulted) tangent point.
#[inline]
pub fn mixed_case(tangent: f64) -> MixedCase {
    if tangent >= 0.0 {
        MixedCase::UpperSplit
    } else {
        MixedCase::LowerSplit
    }
}

/// Reject `l > u` and non-finite endpoints.
pub fn validate_interval(index: usize, interval: &Interval) -> Result<()> {
    if interval.is_valid() {
        Ok(())
    } else {
        Err(SpuError::InvalidInterval {
            index,
            lower: interval.lower,
            upper: interval.upper,
        })
    }
}

/// Reject tangent points that are non-finite or outside the interval.
pub fn validate_tangent(index: usize, interval: &Interval, point: f64) -> Result<()> {
    if point.is_finite() && interval.contains(point) {
        Ok(())
    } else {
        Err(SpuError::InvalidTangentPoint {
            index,
            point,
            lower: interval.lower,
            upper: interval.upper,
        })
    }
}

/// Index groups of a batch, one per region / mixed sub-case.
///
/// Every input index appears in exactly one group; within a group indices
/// are ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionPartition {
    pub convex: Vec<usize>,
    pub concave: Vec<usize>,
    pub upper_split: Vec<usize>,
    pub lower_split: Vec<usize>,
}

impl RegionPartition {
    /// Validate and partition a batch.
    ///
    /// `tangents`, if given, must have the same length as `intervals`. The
    /// mixed sub-case is decided after defaulting a missing tangent point
    /// to the midpoint, since the midpoint itself may fall on either side of 0.
    pub fn build(intervals: &[Interval], tangents: Option<&[Option<f64>]>) -> Result<Self> {
        if let Some(t) = tangents {
            if t.len() != intervals.len() {
                return Err(SpuError::ShapeMismatch {
                    expected: intervals.len(),
                    got: t.len(),
                });
            }
        }

        let mut partition = Self::default();
        for (idx, interval) in intervals.iter().enumerate() {
            validate_interval(idx, interval)?;
            let tangent = tangents.and_then(|t| t[idx]);
            if let Some(point) = tangent {
                validate_tangent(idx, interval, point)?;
            }

            match classify(interval) {
                Region::Convex => partition.convex.push(idx),
                Region::Concave => partition.concave.push(idx),
                Region::Mixed => {
                    let t = tangent.unwrap_or_else(|| interval.midpoint());
                    match mixed_case(t) {
                        MixedCase::UpperSplit => partition.upper_split.push(idx),
                        MixedCase::LowerSplit => partition.lower_split.push(idx),
                    }
                }
            }
        }
        Ok(partition)
    }

    /// Total number of indices across all groups.
    pub fn len(&self) -> usize {
        self.convex.len() + self.concave.len() + self.upper_split.len() + self.lower_split.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of mixed intervals in either sub-case.
    pub fn mixed_len(&self) -> usize {
        self.upper_split.len() + self.lower_split.len()
    }
}
