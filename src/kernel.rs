//! Squared-exponential (RBF) covariance function.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hyperparameters of the RBF kernel.
///
/// Fixed for the lifetime of a session; they are not learned from data.
///
/// # Examples
///
/// ```
/// use gp_bayesopt::kernel::KernelParams;
///
/// let params = KernelParams::new(1.0, 2.0, 1e-4).unwrap();
/// assert_eq!(params.eval(3.0, 3.0), 1.0);
/// assert_eq!(params.eval(0.0, 2.0), params.eval(2.0, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KernelParams {
    signal_variance: f64,
    length_scale: f64,
    noise_variance: f64,
}

impl KernelParams {
    /// Create kernel parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKernelParams`] unless `signal_variance > 0`,
    /// `length_scale > 0` and `noise_variance >= 0`, all finite.
    pub fn new(signal_variance: f64, length_scale: f64, noise_variance: f64) -> Result<Self> {
        if !(signal_variance.is_finite() && signal_variance > 0.0) {
            return Err(Error::InvalidKernelParams(
                "signal variance must be finite and positive",
            ));
        }
        if !(length_scale.is_finite() && length_scale > 0.0) {
            return Err(Error::InvalidKernelParams(
                "length scale must be finite and positive",
            ));
        }
        if !(noise_variance.is_finite() && noise_variance >= 0.0) {
            return Err(Error::InvalidKernelParams(
                "noise variance must be finite and non-negative",
            ));
        }
        Ok(Self {
            signal_variance,
            length_scale,
            noise_variance,
        })
    }

    /// Default parameters for a search interval `[low, high]`: unit signal
    /// variance, a length scale of a fifth of the interval, and a noise
    /// standard deviation of 0.01.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] if `low >= high` or either bound is
    /// not finite.
    pub fn for_bounds(low: f64, high: f64) -> Result<Self> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(Error::InvalidBounds { low, high });
        }
        Self::new(1.0, (high - low) / 5.0, 0.01 * 0.01)
    }

    /// `σ_f²`
    #[must_use]
    pub fn signal_variance(&self) -> f64 {
        self.signal_variance
    }

    /// `ℓ`
    #[must_use]
    pub fn length_scale(&self) -> f64 {
        self.length_scale
    }

    /// `σₙ²`, added to the diagonal of the covariance matrix.
    #[must_use]
    pub fn noise_variance(&self) -> f64 {
        self.noise_variance
    }

    /// `k(x1, x2) = σ_f² · exp(-0.5 · (x1 - x2)² / ℓ²)`
    #[must_use]
    pub fn eval(&self, x1: f64, x2: f64) -> f64 {
        let d = x1 - x2;
        self.signal_variance * (-0.5 * d * d / (self.length_scale * self.length_scale)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_symmetry() {
        let params = KernelParams::new(2.5, 0.7, 0.0).unwrap();
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..500 {
            let a = rng.f64() * 20.0 - 10.0;
            let b = rng.f64() * 20.0 - 10.0;
            assert_eq!(params.eval(a, b), params.eval(b, a));
        }
    }

    #[test]
    fn test_kernel_self_similarity() {
        let params = KernelParams::new(3.0, 1.5, 0.1).unwrap();
        for a in [-1e6, -3.0, 0.0, 0.25, 7.0, 1e9] {
            assert_eq!(params.eval(a, a), 3.0);
        }
    }

    #[test]
    fn test_kernel_decays_with_distance() {
        let params = KernelParams::new(1.0, 1.0, 0.0).unwrap();
        let near = params.eval(0.0, 0.5);
        let far = params.eval(0.0, 3.0);
        assert!(near > far);
        assert!(far > 0.0);
        assert!((params.eval(0.0, 1.0) - (-0.5_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(KernelParams::new(0.0, 1.0, 0.0).is_err());
        assert!(KernelParams::new(1.0, -1.0, 0.0).is_err());
        assert!(KernelParams::new(1.0, 1.0, -1e-3).is_err());
        assert!(KernelParams::new(f64::NAN, 1.0, 0.0).is_err());
        assert!(KernelParams::new(1.0, f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_for_bounds_defaults() {
        let params = KernelParams::for_bounds(0.0, 10.0).unwrap();
        assert_eq!(params.signal_variance(), 1.0);
        assert!((params.length_scale() - 2.0).abs() < 1e-15);
        assert!((params.noise_variance() - 1e-4).abs() < 1e-18);

        assert!(matches!(
            KernelParams::for_bounds(1.0, 1.0),
            Err(Error::InvalidBounds { .. })
        ));
    }
}
