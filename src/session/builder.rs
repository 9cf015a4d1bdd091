use crate::acquisition::{self, DEFAULT_GRID_SIZE};
use crate::error::{Error, Result};
use crate::gp::GaussianProcess;
use crate::kernel::KernelParams;
use crate::objective::Problem;

use super::{InitResult, Session, validate_exploration};

/// Exploration bonus used for the EI curve reported at initialization.
pub const DEFAULT_INITIAL_EXPLORATION: f64 = 0.01;

/// A builder for starting a [`Session`] with non-default settings.
///
/// Created via [`Session::builder()`].
///
/// # Defaults
///
/// - Kernel parameters: [`KernelParams::for_bounds`] of the problem
/// - Grid size: 100
/// - Initial exploration: 0.01
/// - Seed: random
///
/// # Examples
///
/// ```
/// use gp_bayesopt::kernel::KernelParams;
/// use gp_bayesopt::Session;
///
/// let (session, init) = Session::builder()
///     .kernel_params(KernelParams::new(1.0, 0.5, 1e-4).unwrap())
///     .grid_size(50)
///     .seed(7)
///     .initialize("gramacy_lee", 4)
///     .unwrap();
///
/// assert_eq!(init.grid.len(), 50);
/// assert_eq!(session.n_samples(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct SessionBuilder {
    kernel_params: Option<KernelParams>,
    grid_size: usize,
    initial_exploration: f64,
    seed: Option<u64>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            kernel_params: None,
            grid_size: DEFAULT_GRID_SIZE,
            initial_exploration: DEFAULT_INITIAL_EXPLORATION,
            seed: None,
        }
    }
}

impl SessionBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use fixed kernel hyperparameters instead of the bounds-derived default.
    #[must_use]
    pub fn kernel_params(mut self, params: KernelParams) -> Self {
        self.kernel_params = Some(params);
        self
    }

    /// Set the number of grid points for acquisition and payload curves.
    ///
    /// Must be at least 2; checked when the session is initialized.
    #[must_use]
    pub fn grid_size(mut self, n: usize) -> Self {
        self.grid_size = n;
        self
    }

    /// Set the exploration bonus used for the EI curve and suggested point
    /// reported at initialization.
    ///
    /// Steps take their own exploration argument; this value only affects
    /// the init payload.
    #[must_use]
    pub fn initial_exploration(mut self, exploration: f64) -> Self {
        self.initial_exploration = exploration;
        self
    }

    /// Set the random seed for the initial samples.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start a session on a catalog objective.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownObjective`] if `objective_id` is not in the
    /// catalog, and otherwise the errors of
    /// [`initialize_problem`](Self::initialize_problem).
    pub fn initialize(
        self,
        objective_id: &str,
        n_initial_samples: u32,
    ) -> Result<(Session, InitResult)> {
        let problem = Problem::resolve(objective_id)?;
        self.initialize_problem(problem, n_initial_samples)
    }

    /// Start a session on an arbitrary problem.
    ///
    /// Draws `n_initial_samples` uniform points, evaluates them and fits the
    /// GP.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptySamples`] if `n_initial_samples` is 0.
    /// - [`Error::InvalidGridSize`] if the grid size is below 2.
    /// - [`Error::InvalidExploration`] if the initial exploration is negative
    ///   or not finite.
    /// - [`Error::InvalidBounds`] if the default kernel parameters cannot be
    ///   derived from the problem bounds.
    pub fn initialize_problem(
        self,
        problem: Problem,
        n_initial_samples: u32,
    ) -> Result<(Session, InitResult)> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "initialize",
            objective = ?problem.id(),
            n_initial_samples,
            grid_size = self.grid_size
        )
        .entered();

        if n_initial_samples == 0 {
            return Err(Error::EmptySamples);
        }
        if self.grid_size < 2 {
            return Err(Error::InvalidGridSize(self.grid_size));
        }
        validate_exploration(self.initial_exploration)?;

        let (low, high) = problem.bounds();
        let params = match self.kernel_params {
            Some(params) => params,
            None => KernelParams::for_bounds(low, high)?,
        };
        let mut rng = self
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

        let x: Vec<f64> = (0..n_initial_samples)
            .map(|_| problem.sample_uniform(&mut rng))
            .collect();
        let y = problem.evaluate_grid(&x);

        let mut gp = GaussianProcess::new(params);
        gp.fit(&x, &y)?;

        let grid = acquisition::grid(low, high, self.grid_size);
        let true_on_grid = problem.evaluate_grid(&grid);

        let session = Session {
            problem,
            gp,
            x,
            y,
            grid,
            true_on_grid,
            iteration: 0,
        };
        let init = session.init_report(self.initial_exploration)?;
        trace_info!(
            n_samples = session.n_samples(),
            suggested_next_x = init.suggested_next_x,
            "session initialized"
        );
        Ok((session, init))
    }
}
