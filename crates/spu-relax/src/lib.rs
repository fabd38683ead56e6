//! Sound linear relaxations of the SPU activation.
//!
//! For each input interval `[l, u]` this crate produces two lines
//! `(w_l, b_l)` and `(w_u, b_u)` with
//! `w_l * x + b_l <= SPU(x) <= w_u * x + b_u` for every `x` in `[l, u]`,
//! where `SPU(x) = x² - 0.5` for `x >= 0` and `-σ(x)` otherwise.
//!
//! Intervals are split by region:
//! - Convex (`l >= 0`): tangent below, chord above
//! - Concave (`u <= 0`): chord below, tangent above
//! - Mixed (`l < 0 < u`): split again by the sign of the tangent point
//!
//! The lines touch the curve wherever possible, since any slack is
//! compounded by later layers of a bound-propagation verifier.

pub mod activation;
pub mod bounds;
pub mod concave;
pub mod convex;
pub mod mixed;
pub mod parallel;
pub mod region;
pub mod soundness;
pub mod types;

pub use activation::{sigmoid, spu, spu_array, spu_derivative, spu_derivative_array};
pub use bounds::{
    compute_linear_bounds, compute_linear_bounds_arrays, compute_linear_bounds_with_tangents,
    SpuRelaxer,
};
pub use mixed::UpperCandidate;
pub use parallel::ParallelConfig;
pub use region::{classify, RegionPartition};
pub use soundness::{check_soundness, SoundnessViolation, ViolationSide};
pub use types::{LinearRelaxation, RelaxConfig};

pub use spu_core::{BoundPair, Interval, LinearBound, MixedCase, Region, Result, SpuError};

#[cfg(test)]
mod tests;
