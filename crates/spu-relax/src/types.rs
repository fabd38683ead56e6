//! Configuration and array-form results for SPU relaxation.

use crate::parallel::ParallelConfig;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use spu_core::{BoundPair, LinearBound, Result, SpuError};

/// Configuration for [`crate::SpuRelaxer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaxConfig {
    /// How region groups are spread across threads.
    pub parallel: ParallelConfig,
    /// Emit a warning when an upper-split tangent point lies beyond the
    /// interval midpoint, where the upper line has not been verified sound.
    pub warn_unverified_tangent: bool,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            parallel: ParallelConfig::default(),
            warn_unverified_tangent: true,
        }
    }
}

impl RelaxConfig {
    /// Always run serially.
    pub fn serial() -> Self {
        Self {
            parallel: ParallelConfig {
                min_batch_for_parallel: usize::MAX,
                max_threads: None,
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.parallel.max_threads == Some(0) {
            return Err(SpuError::InvalidConfig(
                "max_threads must be at least 1".to_string(),
            ));
        }
        if self.parallel.min_batch_for_parallel == 0 {
            return Err(SpuError::InvalidConfig(
                "min_batch_for_parallel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Relaxation coefficients for a batch, one entry per interval.
///
/// Represents `lower_w * x + lower_b <= SPU(x) <= upper_w * x + upper_b`
/// elementwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRelaxation {
    /// Lower bound slopes: shape (n,)
    pub lower_w: Array1<f64>,
    /// Lower bound intercepts: shape (n,)
    pub lower_b: Array1<f64>,
    /// Upper bound slopes: shape (n,)
    pub upper_w: Array1<f64>,
    /// Upper bound intercepts: shape (n,)
    pub upper_b: Array1<f64>,
}

impl LinearRelaxation {
    pub fn from_pairs(pairs: &[BoundPair]) -> Self {
        Self {
            lower_w: pairs.iter().map(|p| p.lower.slope).collect(),
            lower_b: pairs.iter().map(|p| p.lower.intercept).collect(),
            upper_w: pairs.iter().map(|p| p.upper.slope).collect(),
            upper_b: pairs.iter().map(|p| p.upper.intercept).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lower_w.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower_w.is_empty()
    }

    /// Bound pair at `idx`, if in range.
    pub fn pair(&self, idx: usize) -> Option<BoundPair> {
        if idx >= self.len() {
            return None;
        }
        Some(BoundPair::new(
            LinearBound::new(self.lower_w[idx], self.lower_b[idx]),
            LinearBound::new(self.upper_w[idx], self.upper_b[idx]),
        ))
    }

    /// Lower line evaluated elementwise at `x`.
    pub fn eval_lower(&self, x: &Array1<f64>) -> Array1<f64> {
        &self.lower_w * x + &self.lower_b
    }

    /// Upper line evaluated elementwise at `x`.
    pub fn eval_upper(&self, x: &Array1<f64>) -> Array1<f64> {
        &self.upper_w * x + &self.upper_b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RelaxConfig::default().validate().is_ok());
        assert!(RelaxConfig::serial().validate().is_ok());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let mut config = RelaxConfig::default();
        config.parallel.max_threads = Some(0);
        assert!(matches!(
            config.validate(),
            Err(SpuError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = RelaxConfig {
            parallel: ParallelConfig {
                min_batch_for_parallel: 64,
                max_threads: Some(2),
            },
            warn_unverified_tangent: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: RelaxConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_linear_relaxation_from_pairs() {
        let pairs = vec![
            BoundPair::new(LinearBound::new(1.0, 2.0), LinearBound::new(3.0, 4.0)),
            BoundPair::new(LinearBound::new(-1.0, 0.0), LinearBound::new(0.5, 1.0)),
        ];
        let relax = LinearRelaxation::from_pairs(&pairs);
        assert_eq!(relax.len(), 2);
        assert_eq!(relax.pair(1), Some(pairs[1]));
        assert_eq!(relax.pair(2), None);

        let x = arr1(&[1.0, 2.0]);
        assert_eq!(relax.eval_lower(&x), arr1(&[3.0, -2.0]));
        assert_eq!(relax.eval_upper(&x), arr1(&[7.0, 2.0]));
    }

    #[test]
    fn test_linear_relaxation_empty() {
        let relax = LinearRelaxation::from_pairs(&[]);
        assert!(relax.is_empty());
    }
}
