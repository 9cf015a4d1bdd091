//! Sequential optimization session: initialize, then step.
//!
//! A [`Session`] owns the [`Problem`], the growing sample set and the
//! [`GaussianProcess`] fitted to it. It is created by
//! [`Session::initialize`] (or a [`SessionBuilder`]) and mutated only by
//! [`Session::step`]. There is no convergence criterion; the caller decides
//! when to stop stepping.
//!
//! Each step:
//!
//! 1. predicts the posterior on the grid with the current model,
//! 2. picks the grid point with maximal Expected Improvement,
//! 3. evaluates the objective there,
//! 4. refits the GP on the grown sample set.
//!
//! The refit is built on a fresh model and only committed together with the
//! new sample, so a failing step leaves the session exactly as it was.

use crate::acquisition::{self, maximize_on_grid};
use crate::error::{Error, Result};
use crate::gp::GaussianProcess;
use crate::kernel::KernelParams;
use crate::objective::Problem;

mod builder;
mod report;

pub use builder::{DEFAULT_INITIAL_EXPLORATION, SessionBuilder};
pub use report::{InitResult, Sample, StepResult};

/// State of one Bayesian optimization run.
///
/// # Examples
///
/// ```
/// use gp_bayesopt::Session;
///
/// let (mut session, init) = Session::initialize("sin_x_x", 3).unwrap();
/// assert_eq!(init.samples.len(), 3);
///
/// let step = session.step(0.01).unwrap();
/// assert_eq!(step.iteration, 1);
/// assert_eq!(step.samples.len(), 4);
/// assert!((0.0..=10.0).contains(&step.next_x));
/// assert_eq!(step.posterior_mean.len(), step.grid.len());
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    problem: Problem,
    gp: GaussianProcess,
    x: Vec<f64>,
    y: Vec<f64>,
    grid: Vec<f64>,
    true_on_grid: Vec<f64>,
    iteration: u32,
}

impl Session {
    /// Return a [`SessionBuilder`] for non-default settings.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Start a session on a catalog objective with default settings and a
    /// random seed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownObjective`] for an identifier outside the
    /// catalog and [`Error::EmptySamples`] if `n_initial_samples` is 0.
    pub fn initialize(objective_id: &str, n_initial_samples: u32) -> Result<(Self, InitResult)> {
        SessionBuilder::new().initialize(objective_id, n_initial_samples)
    }

    /// Run one optimization step with the given exploration bonus.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExploration`] if `exploration` is negative or
    /// not finite. The session is unchanged on error.
    pub fn step(&mut self, exploration: f64) -> Result<StepResult> {
        #[cfg(feature = "tracing")]
        let _span =
            tracing::info_span!("step", iteration = self.iteration + 1, exploration).entered();

        validate_exploration(exploration)?;

        let posterior = self.gp.predict(&self.grid)?;
        let f_best = acquisition::f_best(&self.y).ok_or(Error::EmptySamples)?;
        let search = maximize_on_grid(&self.grid, &posterior, f_best, exploration)?;

        let next_x = search.best_x;
        let next_y = self.problem.evaluate(next_x);

        let mut x = self.x.clone();
        let mut y = self.y.clone();
        x.push(next_x);
        y.push(next_y);

        let mut gp = GaussianProcess::new(*self.gp.params());
        gp.fit(&x, &y)?;
        let updated = gp.predict(&self.grid)?;

        self.x = x;
        self.y = y;
        self.gp = gp;
        self.iteration += 1;
        trace_info!(
            iteration = self.iteration,
            next_x,
            next_y,
            ei = search.ei[search.best_index],
            "sample evaluated"
        );

        let posterior_std = updated.std_dev();
        Ok(StepResult {
            iteration: self.iteration,
            samples: self.samples(),
            next_x,
            posterior_mean: updated.mean,
            posterior_std,
            ei_curve: search.ei,
            true_function_on_grid: self.true_on_grid.clone(),
            grid: self.grid.clone(),
        })
    }

    /// Run `n_steps` steps with a fixed exploration bonus.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns its error; steps that
    /// already completed stay applied.
    pub fn run(&mut self, n_steps: u32, exploration: f64) -> Result<Vec<StepResult>> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("run", n_steps, exploration).entered();

        (0..n_steps).map(|_| self.step(exploration)).collect()
    }

    /// The objective and its bounds.
    #[must_use]
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Kernel hyperparameters of the surrogate.
    #[must_use]
    pub fn kernel_params(&self) -> &KernelParams {
        self.gp.params()
    }

    /// The surrogate, fitted to every sample so far.
    #[must_use]
    pub fn gp(&self) -> &GaussianProcess {
        &self.gp
    }

    /// Number of completed steps.
    #[must_use]
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Number of evaluated samples, initial ones included.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.x.len()
    }

    /// Sampled abscissas in evaluation order.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Objective values in evaluation order.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Every sample in evaluation order.
    #[must_use]
    pub fn samples(&self) -> Vec<Sample> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| Sample { x, y })
            .collect()
    }

    /// The sample with the lowest objective value. Ties go to the earliest.
    #[must_use]
    pub fn best(&self) -> Option<Sample> {
        self.samples()
            .into_iter()
            .reduce(|best, s| if s.y < best.y { s } else { best })
    }

    /// Grid used for acquisition and payload curves.
    #[must_use]
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    fn init_report(&self, exploration: f64) -> Result<InitResult> {
        let posterior = self.gp.predict(&self.grid)?;
        let f_best = acquisition::f_best(&self.y).ok_or(Error::EmptySamples)?;
        let search = maximize_on_grid(&self.grid, &posterior, f_best, exploration)?;
        let posterior_std = posterior.std_dev();
        Ok(InitResult {
            iteration: 0,
            samples: self.samples(),
            posterior_mean: posterior.mean,
            posterior_std,
            ei_curve: search.ei,
            grid: self.grid.clone(),
            true_function_on_grid: self.true_on_grid.clone(),
            suggested_next_x: search.best_x,
        })
    }
}

fn validate_exploration(exploration: f64) -> Result<()> {
    if exploration.is_finite() && exploration >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidExploration(exploration))
    }
}
