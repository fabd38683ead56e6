//! Crate-level tests.
//!
//! - `relaxation`: scenario tests for each region, the lower-split
//!   tie-break, degenerate and invalid inputs, and boundary continuity
//! - `proptest_soundness`: randomized soundness, contact tightness, and
//!   batch invariance
