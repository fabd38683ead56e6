//! Reference evaluation of the SPU activation and its derivative.
//!
//! ```text
//! SPU(x)  = x² - 0.5      for x >= 0
//!         = -σ(x)         for x < 0
//! SPU'(x) = 2x            for x >= 0
//!         = σ(x)(σ(x)-1)  for x < 0
//! ```
//!
//! Both one-sided derivatives at 0 are 0, so `SPU'(0) = 0` is exact.

use ndarray::Array1;

/// Logistic sigmoid `1 / (1 + e^-x)`.
///
/// Two-branch form so that `exp` is only ever called on a non-positive
/// argument and cannot overflow.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// SPU value at `x`.
#[inline]
pub fn spu(x: f64) -> f64 {
    if x >= 0.0 {
        x * x - 0.5
    } else {
        -sigmoid(x)
    }
}

/// First derivative of SPU at `x`.
#[inline]
pub fn spu_derivative(x: f64) -> f64 {
    if x >= 0.0 {
        2.0 * x
    } else {
        let s = sigmoid(x);
        s * (s - 1.0)
    }
}

/// Elementwise [`spu`].
pub fn spu_array(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(spu)
}

/// Elementwise [`spu_derivative`].
pub fn spu_derivative_array(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(spu_derivative)
}
