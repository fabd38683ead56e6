//! Core types for SPU linear relaxation.
//!
//! This crate provides the value types shared by the relaxation engine:
//! input intervals, linear bounds, per-interval bound pairs, the region
//! classes an interval can fall into, and the error type.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// An input interval: [lower, upper].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// Create a new interval.
    ///
    /// No validation happens here; the relaxation entry points reject
    /// `lower > upper` with [`SpuError::InvalidInterval`].
    #[inline]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Create a point interval.
    #[inline]
    pub fn point(value: f64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    /// Whether the interval is well formed: finite endpoints and `lower <= upper`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower <= self.upper
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Midpoint `(l + u) / 2`, the default tangent point.
    ///
    /// Halved before summing so endpoints near `f64::MAX` do not overflow.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        self.lower * 0.5 + self.upper * 0.5
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }
}

impl From<RangeInclusive<f64>> for Interval {
    fn from(range: RangeInclusive<f64>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

impl From<(f64, f64)> for Interval {
    fn from((lower, upper): (f64, f64)) -> Self {
        Self::new(lower, upper)
    }
}

/// A line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearBound {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearBound {
    #[inline]
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Evaluate the line at `x`.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.slope.is_finite() && self.intercept.is_finite()
    }
}

/// Lower and upper linear bounds for one interval.
///
/// For every `x` in the interval the pair was built for:
/// `lower.eval(x) <= SPU(x) <= upper.eval(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundPair {
    pub lower: LinearBound,
    pub upper: LinearBound,
}

impl BoundPair {
    #[inline]
    pub fn new(lower: LinearBound, upper: LinearBound) -> Self {
        Self { lower, upper }
    }

    /// Flatten into `(w_l, b_l, w_u, b_u)`.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (
            self.lower.slope,
            self.lower.intercept,
            self.upper.slope,
            self.upper.intercept,
        )
    }

    /// Concrete output interval implied by the two lines over `input`.
    ///
    /// A line attains its extrema at the interval endpoints, so the lower
    /// line is minimised and the upper line maximised over `{l, u}`.
    pub fn concretize(&self, input: &Interval) -> Interval {
        let lower = self
            .lower
            .eval(input.lower)
            .min(self.lower.eval(input.upper));
        let upper = self
            .upper
            .eval(input.lower)
            .max(self.upper.eval(input.upper));
        Interval::new(lower, upper)
    }

    /// Gap between the two lines at `x`.
    #[inline]
    pub fn gap_at(&self, x: f64) -> f64 {
        self.upper.eval(x) - self.lower.eval(x)
    }
}

/// Curvature class of an interval, decided by the signs of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// `l >= 0`: SPU is `x² - 0.5`, convex.
    Convex,
    /// `u <= 0`: SPU is `-σ(x)`, concave.
    Concave,
    /// `l < 0 < u`: the interval straddles the curvature change at 0.
    Mixed,
}

/// Sub-case of a [`Region::Mixed`] interval, decided by the tangent point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MixedCase {
    /// `l < 0 <= t < u`.
    UpperSplit,
    /// `l < t < 0 < u`.
    LowerSplit,
}

/// Error types for SPU relaxation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpuError {
    #[error("Invalid interval at index {index}: [{lower}, {upper}]")]
    InvalidInterval { index: usize, lower: f64, upper: f64 },

    #[error("Invalid tangent point at index {index}: {point} is outside [{lower}, {upper}]")]
    InvalidTangentPoint {
        index: usize,
        point: f64,
        lower: f64,
        upper: f64,
    },

    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SpuError>;
