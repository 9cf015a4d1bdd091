//! Expected Improvement acquisition, maximized over a discrete grid.
//!
//! The engine minimizes, so improvement is measured below the best observed
//! value `f_best = min(Y)`:
//!
//! ```text
//! z  = (f_best - μ - ξ) / σ
//! EI = (f_best - μ - ξ) Φ(z) + σ φ(z)     σ > 0
//! EI = 0                                   σ <= 0
//! ```
//!
//! `ξ >= 0` is the exploration bonus. Continuous maximization of EI is
//! replaced by an exhaustive scan of an evenly spaced grid over the bounds;
//! ties go to the leftmost grid point.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gp::PosteriorResult;

/// Default number of grid points used for acquisition and for the posterior
/// payloads.
pub const DEFAULT_GRID_SIZE: usize = 100;

/// Standard normal PDF.
#[must_use]
pub fn norm_pdf(z: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * z * z).exp()
}

/// Standard normal CDF.
///
/// Abramowitz & Stegun 26.2.17 rational approximation, absolute error below
/// `7.5e-8`.
#[must_use]
pub fn norm_cdf(z: f64) -> f64 {
    const P: f64 = 0.231_641_9;
    const B1: f64 = 0.319_381_530;
    const B2: f64 = -0.356_563_782;
    const B3: f64 = 1.781_477_937;
    const B4: f64 = -1.821_255_978;
    const B5: f64 = 1.330_274_429;

    let t = 1.0 / (1.0 + P * z.abs());
    let poly = t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));
    let tail = norm_pdf(z) * poly;
    if z > 0.0 { 1.0 - tail } else { tail }
}

/// Expected Improvement below `f_best` for a Gaussian with the given mean and
/// standard deviation.
///
/// Returns 0 when `std_dev` is zero (or not a positive number). The result
/// is never negative.
///
/// # Examples
///
/// ```
/// use gp_bayesopt::acquisition::expected_improvement;
///
/// // A point predicted well below the incumbent is worth sampling...
/// let promising = expected_improvement(-1.0, 0.5, 0.0, 0.01);
/// // ...more than one predicted above it.
/// let poor = expected_improvement(1.0, 0.5, 0.0, 0.01);
/// assert!(promising > poor);
/// assert_eq!(expected_improvement(-1.0, 0.0, 0.0, 0.01), 0.0);
/// ```
#[must_use]
pub fn expected_improvement(mean: f64, std_dev: f64, f_best: f64, exploration: f64) -> f64 {
    if std_dev.is_nan() || std_dev <= 0.0 {
        return 0.0;
    }
    let improvement = f_best - mean - exploration;
    let z = improvement / std_dev;
    (improvement * norm_cdf(z) + std_dev * norm_pdf(z)).max(0.0)
}

/// Expected Improvement at every point of a posterior.
#[must_use]
pub fn expected_improvement_curve(
    posterior: &PosteriorResult,
    f_best: f64,
    exploration: f64,
) -> Vec<f64> {
    posterior
        .mean
        .iter()
        .zip(&posterior.variance)
        .map(|(&mu, &var)| expected_improvement(mu, var.sqrt(), f_best, exploration))
        .collect()
}

/// Best (lowest) observed objective value, or `None` if there are none.
#[must_use]
pub fn f_best(y: &[f64]) -> Option<f64> {
    y.iter().copied().reduce(f64::min)
}

/// Index of the first maximum of `values`. NaN entries are ignored.
///
/// Returns `None` if `values` is empty or all NaN.
#[must_use]
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best, (i, &v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// `n` evenly spaced points over `[low, high]`, endpoints included.
///
/// `n == 1` yields `[low]`; `n == 0` yields an empty grid.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid(low: f64, high: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| low + (i as f64 / last) * (high - low))
                .collect()
        }
    }
}

/// Outcome of scanning a grid for the maximum of Expected Improvement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSearch {
    /// EI at every grid point.
    pub ei: Vec<f64>,
    /// Index of the first grid point with maximal EI.
    pub best_index: usize,
    /// Grid abscissa at `best_index`.
    pub best_x: f64,
}

/// Evaluate EI over `grid` from its posterior and pick the maximizer.
///
/// # Errors
///
/// - [`Error::InvalidGridSize`] if `grid` is empty.
/// - [`Error::DimensionMismatch`] if `posterior` was not computed on `grid`.
pub fn maximize_on_grid(
    grid: &[f64],
    posterior: &PosteriorResult,
    f_best: f64,
    exploration: f64,
) -> Result<GridSearch> {
    if grid.is_empty() {
        return Err(Error::InvalidGridSize(0));
    }
    if posterior.len() != grid.len() || posterior.variance.len() != grid.len() {
        return Err(Error::DimensionMismatch {
            expected: grid.len(),
            got: posterior.len(),
        });
    }

    let ei = expected_improvement_curve(posterior, f_best, exploration);
    // All-NaN EI only happens with a NaN incumbent; fall back to the left edge.
    let best_index = argmax(&ei).unwrap_or(0);
    Ok(GridSearch {
        best_x: grid[best_index],
        ei,
        best_index,
    })
}
