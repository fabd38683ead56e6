//! Parallel evaluation of region groups.
//!
//! Every interval reads only its own `(l, u, t)` and writes only its own
//! output slot, so a group can be mapped with rayon and scattered back by
//! index without synchronisation.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use spu_core::{BoundPair, Interval, Result, SpuError};
use tracing::trace;

/// Configuration for parallel group evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Minimum group size before enabling parallelism.
    /// Below this threshold, serial execution is used to avoid overhead.
    pub min_batch_for_parallel: usize,

    /// Maximum number of threads to use.
    /// None means use rayon's default (typically number of cores).
    pub max_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            min_batch_for_parallel: 1024,
            max_threads: None,
        }
    }
}

impl ParallelConfig {
    /// Build a dedicated pool when a thread limit is configured.
    pub fn build_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        match self.max_threads {
            Some(max_threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads)
                .build()
                .map(Some)
                .map_err(|e| SpuError::InvalidConfig(format!("Failed to create thread pool: {}", e))),
            None => Ok(None),
        }
    }
}

/// Evaluate `relax` for each index in `group`, returning `(index, pair)`.
pub(crate) fn map_group<F>(
    name: &str,
    group: &[usize],
    intervals: &[Interval],
    tangents: Option<&[Option<f64>]>,
    config: &ParallelConfig,
    pool: Option<&rayon::ThreadPool>,
    relax: F,
) -> Vec<(usize, BoundPair)>
where
    F: Fn(&Interval, Option<f64>) -> BoundPair + Sync,
{
    let tangent_at = |idx: usize| tangents.and_then(|t| t[idx]);
    let eval = |&idx: &usize| (idx, relax(&intervals[idx], tangent_at(idx)));

    if group.len() < config.min_batch_for_parallel {
        trace!("{}: {} intervals (serial)", name, group.len());
        return group.iter().map(eval).collect();
    }

    trace!("{}: {} intervals (parallel)", name, group.len());
    match pool {
        Some(pool) => pool.install(|| group.par_iter().map(eval).collect()),
        None => group.par_iter().map(eval).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convex::convex_relaxation;

    #[test]
    fn test_map_group_serial_and_parallel_agree() {
        let intervals: Vec<Interval> = (0..200)
            .map(|i| Interval::new(i as f64 * 0.01, i as f64 * 0.01 + 0.5))
            .collect();
        let group: Vec<usize> = (0..intervals.len()).rev().collect();

        let serial = map_group(
            "convex",
            &group,
            &intervals,
            None,
            &ParallelConfig::default(),
            None,
            convex_relaxation,
        );
        let parallel_config = ParallelConfig {
            min_batch_for_parallel: 1,
            max_threads: Some(2),
        };
        let pool = parallel_config.build_pool().unwrap();
        let parallel = map_group(
            "convex",
            &group,
            &intervals,
            None,
            &parallel_config,
            pool.as_ref(),
            convex_relaxation,
        );
        assert_eq!(serial, parallel);
        assert_eq!(serial[0].0, 199);
    }

    #[test]
    fn test_build_pool_without_limit() {
        assert!(ParallelConfig::default().build_pool().unwrap().is_none());
    }
}
