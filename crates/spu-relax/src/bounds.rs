//! Batch assembly of SPU linear relaxations.
//!
//! A batch is validated and partitioned once into region groups
//! ([`RegionPartition`]); each group runs through its bounder and the
//! results are scattered back to their original positions, so the output
//! always has the same length and order as the input.

use crate::concave::concave_relaxation;
use crate::convex::convex_relaxation;
use crate::mixed::{
    lower_split_relaxation, upper_split_relaxation, upper_split_tangent_verified,
};
use crate::parallel::map_group;
use crate::region::RegionPartition;
use crate::types::{LinearRelaxation, RelaxConfig};
use ndarray::Array1;
use spu_core::{BoundPair, Interval, Result, SpuError};
use tracing::{debug, warn};

/// Relaxation engine for batches of intervals.
pub struct SpuRelaxer {
    config: RelaxConfig,
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for SpuRelaxer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpuRelaxer")
            .field("config", &self.config)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}

impl Default for SpuRelaxer {
    fn default() -> Self {
        Self {
            config: RelaxConfig::default(),
            pool: None,
        }
    }
}

impl SpuRelaxer {
    /// Create a relaxer, validating the configuration.
    pub fn new(config: RelaxConfig) -> Result<Self> {
        config.validate()?;
        let pool = config.parallel.build_pool()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &RelaxConfig {
        &self.config
    }

    /// Relax a batch using the midpoint as every tangent point.
    pub fn relax(&self, intervals: &[Interval]) -> Result<Vec<BoundPair>> {
        self.relax_impl(intervals, None)
    }

    /// Relax a batch with optional per-interval tangent points.
    ///
    /// `tangents` must have one entry per interval; `None` entries fall back
    /// to the midpoint. In the upper-split case the upper line is only known
    /// to be sound for `t <= (l + u) / 2`.
    pub fn relax_with_tangents(
        &self,
        intervals: &[Interval],
        tangents: &[Option<f64>],
    ) -> Result<Vec<BoundPair>> {
        self.relax_impl(intervals, Some(tangents))
    }

    /// Relax a batch given as separate lower / upper arrays.
    pub fn relax_arrays(
        &self,
        lower: &Array1<f64>,
        upper: &Array1<f64>,
    ) -> Result<LinearRelaxation> {
        if lower.len() != upper.len() {
            return Err(SpuError::ShapeMismatch {
                expected: lower.len(),
                got: upper.len(),
            });
        }
        let intervals: Vec<Interval> = lower
            .iter()
            .zip(upper.iter())
            .map(|(&l, &u)| Interval::new(l, u))
            .collect();
        let pairs = self.relax(&intervals)?;
        Ok(LinearRelaxation::from_pairs(&pairs))
    }

    fn relax_impl(
        &self,
        intervals: &[Interval],
        tangents: Option<&[Option<f64>]>,
    ) -> Result<Vec<BoundPair>> {
        let partition = RegionPartition::build(intervals, tangents)?;
        debug!(
            "SPU relaxation: {} intervals ({} convex, {} concave, {} upper-split, {} lower-split)",
            intervals.len(),
            partition.convex.len(),
            partition.concave.len(),
            partition.upper_split.len(),
            partition.lower_split.len()
        );

        if self.config.warn_unverified_tangent {
            self.check_upper_split_tangents(&partition, intervals, tangents);
        }

        let parallel = &self.config.parallel;
        let pool = self.pool.as_ref();
        let groups = [
            map_group(
                "convex",
                &partition.convex,
                intervals,
                tangents,
                parallel,
                pool,
                convex_relaxation,
            ),
            map_group(
                "concave",
                &partition.concave,
                intervals,
                tangents,
                parallel,
                pool,
                concave_relaxation,
            ),
            map_group(
                "upper-split",
                &partition.upper_split,
                intervals,
                tangents,
                parallel,
                pool,
                |interval, t| {
                    let t = t.unwrap_or_else(|| interval.midpoint());
                    upper_split_relaxation(interval.lower, interval.upper, t)
                },
            ),
            map_group(
                "lower-split",
                &partition.lower_split,
                intervals,
                tangents,
                parallel,
                pool,
                |interval, t| {
                    let t = t.unwrap_or_else(|| interval.midpoint());
                    lower_split_relaxation(interval.lower, interval.upper, t)
                },
            ),
        ];

        debug_assert_eq!(partition.len(), intervals.len());
        let mut output: Vec<Option<BoundPair>> = vec![None; intervals.len()];
        for (idx, pair) in groups.into_iter().flatten() {
            output[idx] = Some(pair);
        }
        // The partition covers every index exactly once.
        let pairs: Vec<BoundPair> = output.into_iter().flatten().collect();
        debug_assert_eq!(pairs.len(), intervals.len());
        Ok(pairs)
    }

    fn check_upper_split_tangents(
        &self,
        partition: &RegionPartition,
        intervals: &[Interval],
        tangents: Option<&[Option<f64>]>,
    ) {
        let Some(tangents) = tangents else {
            return;
        };
        let unverified = partition
            .upper_split
            .iter()
            .filter(|&&idx| match tangents[idx] {
                Some(t) => !upper_split_tangent_verified(&intervals[idx], t),
                None => false,
            })
            .count();
        if unverified > 0 {
            warn!(
                "{} upper-split intervals have a tangent point beyond the midpoint; \
                 their upper bounds are not verified sound",
                unverified
            );
        }
    }
}

/// Compute linear bounds for a batch with midpoint tangent points.
pub fn compute_linear_bounds(intervals: &[Interval]) -> Result<Vec<BoundPair>> {
    SpuRelaxer::default().relax(intervals)
}

/// Compute linear bounds for a batch with optional per-interval tangent points.
pub fn compute_linear_bounds_with_tangents(
    intervals: &[Interval],
    tangents: &[Option<f64>],
) -> Result<Vec<BoundPair>> {
    SpuRelaxer::default().relax_with_tangents(intervals, tangents)
}

/// Compute linear bounds for `lower`/`upper` arrays.
pub fn compute_linear_bounds_arrays(
    lower: &Array1<f64>,
    upper: &Array1<f64>,
) -> Result<LinearRelaxation> {
    SpuRelaxer::default().relax_arrays(lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::spu;
    use ndarray::arr1;

    #[test]
    fn test_empty_batch() {
        assert!(compute_linear_bounds(&[]).unwrap().is_empty());
        let relax = compute_linear_bounds_arrays(&Array1::zeros(0), &Array1::zeros(0)).unwrap();
        assert!(relax.is_empty());
    }

    #[test]
    fn test_output_order_matches_input() {
        let intervals = vec![
            Interval::new(-2.0, -1.0),
            Interval::new(1.0, 2.0),
            Interval::new(-3.0, 1.0),
            Interval::new(-1.0, 3.0),
        ];
        let pairs = compute_linear_bounds(&intervals).unwrap();
        assert_eq!(pairs.len(), intervals.len());
        assert_eq!(pairs[0], concave_relaxation(&intervals[0], None));
        assert_eq!(pairs[1], convex_relaxation(&intervals[1], None));
        assert_eq!(pairs[2], lower_split_relaxation(-3.0, 1.0, -1.0));
        assert_eq!(pairs[3], upper_split_relaxation(-1.0, 3.0, 1.0));
    }

    #[test]
    fn test_invalid_interval_fails_batch() {
        let intervals = vec![Interval::new(0.0, 1.0), Interval::new(1.0, 0.5)];
        let err = compute_linear_bounds(&intervals).unwrap_err();
        assert!(matches!(err, SpuError::InvalidInterval { index: 1, .. }));
    }

    #[test]
    fn test_array_length_mismatch() {
        let err = compute_linear_bounds_arrays(&arr1(&[0.0, 1.0]), &arr1(&[1.0])).unwrap_err();
        assert_eq!(
            err,
            SpuError::ShapeMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_arrays_match_pairs() {
        let lower = arr1(&[-2.0, 0.5, -1.0]);
        let upper = arr1(&[-0.5, 2.0, 2.0]);
        let relax = compute_linear_bounds_arrays(&lower, &upper).unwrap();
        for i in 0..3 {
            let expected = compute_linear_bounds(&[Interval::new(lower[i], upper[i])]).unwrap();
            assert_eq!(relax.pair(i), Some(expected[0]));
        }
    }

    #[test]
    fn test_tangent_override() {
        let intervals = vec![Interval::new(0.0, 2.0), Interval::new(0.0, 2.0)];
        let pairs = compute_linear_bounds_with_tangents(&intervals, &[Some(0.5), None]).unwrap();
        assert!((pairs[0].lower.eval(0.5) - spu(0.5)).abs() < 1e-12);
        assert!((pairs[1].lower.eval(1.0) - spu(1.0)).abs() < 1e-12);
        assert_eq!(pairs[0].upper, pairs[1].upper);
    }

    #[test]
    fn test_unverified_tangent_still_produces_output() {
        // t beyond the midpoint: computed, but only warned about.
        let intervals = vec![Interval::new(-1.0, 3.0)];
        let pairs = compute_linear_bounds_with_tangents(&intervals, &[Some(2.0)]).unwrap();
        assert_eq!(pairs[0], upper_split_relaxation(-1.0, 3.0, 2.0));
    }

    #[test]
    fn test_relaxer_rejects_bad_config() {
        let mut config = RelaxConfig::default();
        config.parallel.max_threads = Some(0);
        assert!(SpuRelaxer::new(config).is_err());
    }
}
