#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One evaluation of the objective.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Abscissa.
    pub x: f64,
    /// Objective value at `x`.
    pub y: f64,
}

/// Payload returned by session initialization.
///
/// All curves are evaluated on `grid`. `suggested_next_x` is where the next
/// [`step`](super::Session::step) would sample with the initial exploration
/// bonus; it is informational and does not add a sample.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InitResult {
    /// Always 0.
    pub iteration: u32,
    /// The random initial samples, in evaluation order.
    pub samples: Vec<Sample>,
    /// Posterior mean on the grid.
    pub posterior_mean: Vec<f64>,
    /// Posterior standard deviation on the grid.
    pub posterior_std: Vec<f64>,
    /// Expected Improvement on the grid.
    pub ei_curve: Vec<f64>,
    /// Evenly spaced abscissas over the bounds.
    pub grid: Vec<f64>,
    /// The objective itself on the grid, for overlaying the benchmark.
    pub true_function_on_grid: Vec<f64>,
    /// Grid point with maximal Expected Improvement.
    pub suggested_next_x: f64,
}

/// Payload returned by each optimization step.
///
/// `ei_curve` is the acquisition that chose `next_x` (computed before the
/// new sample was added); `posterior_mean` and `posterior_std` come from the
/// model refitted with it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepResult {
    /// Number of completed steps, starting at 1.
    pub iteration: u32,
    /// Full sample history including the one added by this step.
    pub samples: Vec<Sample>,
    /// Point evaluated by this step.
    pub next_x: f64,
    /// Posterior mean on the grid after the refit.
    pub posterior_mean: Vec<f64>,
    /// Posterior standard deviation on the grid after the refit.
    pub posterior_std: Vec<f64>,
    /// Expected Improvement on the grid before the refit.
    pub ei_curve: Vec<f64>,
    /// The objective itself on the grid.
    pub true_function_on_grid: Vec<f64>,
    /// Evenly spaced abscissas over the bounds.
    pub grid: Vec<f64>,
}

impl StepResult {
    /// The sample added by this step.
    #[must_use]
    pub fn new_sample(&self) -> Option<Sample> {
        self.samples.last().copied()
    }
}
