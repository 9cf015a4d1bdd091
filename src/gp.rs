//! Gaussian Process regression over scalar inputs.
//!
//! The model conditions an RBF-kernel prior on observed samples `(X, Y)` and
//! answers posterior queries:
//!
//! - mean `μ(x*) = k*ᵗ α` with `α = (K + σₙ²I)⁻¹ Y`
//! - variance `σ²(x*) = k(x*, x*) + σₙ² - vᵗv` with `L·v = k*`
//!
//! where `L` is the (regularized) Cholesky factor of `K + σₙ²I`, see
//! [`linalg::cholesky`](crate::linalg::cholesky). The predictive variance
//! includes the observation noise and is clamped at zero.
//!
//! # Examples
//!
//! ```
//! use gp_bayesopt::gp::GaussianProcess;
//! use gp_bayesopt::kernel::KernelParams;
//!
//! let mut gp = GaussianProcess::new(KernelParams::new(1.0, 1.0, 1e-8).unwrap());
//! gp.fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
//!
//! let posterior = gp.predict(&[1.0, 5.0]).unwrap();
//! assert!((posterior.mean[0] - 1.0).abs() < 1e-3);
//! // Far from the data the variance reverts to the prior.
//! assert!(posterior.variance[1] > 0.9);
//! ```

use nalgebra::{DMatrix, DVector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kernel::KernelParams;
use crate::linalg::{self, CholeskyFactor};

/// Posterior mean and variance at a set of query points.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PosteriorResult {
    /// Posterior mean, one entry per query point.
    pub mean: Vec<f64>,
    /// Posterior variance, one entry per query point. Always `>= 0`.
    pub variance: Vec<f64>,
}

impl PosteriorResult {
    /// Number of query points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Returns `true` if the query set was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Posterior standard deviation, `sqrt(variance)`.
    #[must_use]
    pub fn std_dev(&self) -> Vec<f64> {
        self.variance.iter().map(|v| v.sqrt()).collect()
    }
}

/// State produced by a successful fit.
#[derive(Clone, Debug)]
struct FittedModel {
    x: Vec<f64>,
    y: Vec<f64>,
    factor: CholeskyFactor,
    alpha: DVector<f64>,
}

/// A Gaussian Process with fixed RBF hyperparameters.
#[derive(Clone, Debug)]
pub struct GaussianProcess {
    params: KernelParams,
    model: Option<FittedModel>,
}

impl GaussianProcess {
    /// Create an unfitted GP.
    #[must_use]
    pub fn new(params: KernelParams) -> Self {
        Self {
            params,
            model: None,
        }
    }

    /// Kernel hyperparameters.
    #[must_use]
    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    /// Returns `true` once [`fit`](Self::fit) has succeeded at least once.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Number of samples the model was last fitted on (0 if unfitted).
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.x.len())
    }

    /// Training inputs from the last fit.
    #[must_use]
    pub fn train_x(&self) -> &[f64] {
        match &self.model {
            Some(m) => &m.x,
            None => &[],
        }
    }

    /// Training targets from the last fit.
    #[must_use]
    pub fn train_y(&self) -> &[f64] {
        match &self.model {
            Some(m) => &m.y,
            None => &[],
        }
    }

    /// Cholesky factor of `K + σₙ²I` from the last fit.
    #[must_use]
    pub fn cholesky_factor(&self) -> Option<&CholeskyFactor> {
        self.model.as_ref().map(|m| &m.factor)
    }

    /// Condition the GP on `(x, y)`, replacing any previous fit.
    ///
    /// The new factor and `α` are computed in full before the old ones are
    /// replaced; on error the previous fit is kept as it was.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if `x` and `y` differ in length.
    /// - [`Error::EmptySamples`] if they are empty.
    pub fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        if x.is_empty() {
            return Err(Error::EmptySamples);
        }

        let k = self.covariance_matrix(x);
        let factor = linalg::cholesky(&k)?;
        if factor.regularized_pivots() > 0 {
            trace_warn!(
                n = x.len(),
                pivots = factor.regularized_pivots(),
                "covariance matrix is ill-conditioned; regularized cholesky pivots"
            );
        }
        let alpha = factor.solve(&DVector::from_column_slice(y))?;

        self.model = Some(FittedModel {
            x: x.to_vec(),
            y: y.to_vec(),
            factor,
            alpha,
        });
        trace_debug!(n = x.len(), "gaussian process fitted");
        Ok(())
    }

    /// Posterior mean and variance at each query point.
    ///
    /// Does not mutate the model: repeated calls with the same query set
    /// return identical results.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFitted`] if [`fit`](Self::fit) has never
    /// succeeded.
    pub fn predict(&self, query: &[f64]) -> Result<PosteriorResult> {
        let model = self.model.as_ref().ok_or(Error::ModelNotFitted)?;
        let mut mean = Vec::with_capacity(query.len());
        let mut variance = Vec::with_capacity(query.len());
        for &x_star in query {
            let (mu, var) = self.posterior_at(model, x_star)?;
            mean.push(mu);
            variance.push(var);
        }
        Ok(PosteriorResult { mean, variance })
    }

    /// Posterior `(mean, variance)` at a single point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFitted`] if [`fit`](Self::fit) has never
    /// succeeded.
    pub fn predict_one(&self, x: f64) -> Result<(f64, f64)> {
        let model = self.model.as_ref().ok_or(Error::ModelNotFitted)?;
        self.posterior_at(model, x)
    }

    /// Build `K + σₙ²I` for the inputs `x`.
    #[must_use]
    pub fn covariance_matrix(&self, x: &[f64]) -> DMatrix<f64> {
        let n = x.len();
        let noise = self.params.noise_variance();
        DMatrix::from_fn(n, n, |i, j| {
            let k = self.params.eval(x[i], x[j]);
            if i == j { k + noise } else { k }
        })
    }

    fn posterior_at(&self, model: &FittedModel, x_star: f64) -> Result<(f64, f64)> {
        let k_star = DVector::from_fn(model.x.len(), |i, _| self.params.eval(model.x[i], x_star));
        let mean = k_star.dot(&model.alpha);

        let v = model.factor.solve_lower(&k_star)?;
        let prior = self.params.eval(x_star, x_star) + self.params.noise_variance();
        let variance = (prior - v.dot(&v)).max(0.0);
        Ok((mean, variance))
    }
}
