#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when two operands have incompatible shapes.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// The size the operation required.
        expected: usize,
        /// The size that was supplied.
        got: usize,
    },

    /// Returned when a posterior is requested from a GP that has never been fitted.
    #[error("gaussian process has not been fitted")]
    ModelNotFitted,

    /// Returned when an objective identifier is not in the benchmark catalog.
    #[error("unknown objective: '{0}'")]
    UnknownObjective(String),

    /// Returned when fitting or initializing with zero samples.
    #[error("at least one sample is required")]
    EmptySamples,

    /// Returned when the lower bound is not strictly less than the upper bound.
    #[error("invalid bounds: low ({low}) must be less than high ({high})")]
    InvalidBounds {
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a kernel hyperparameter is out of range.
    #[error("invalid kernel parameters: {0}")]
    InvalidKernelParams(&'static str),

    /// Returned when the exploration bonus is negative or not finite.
    #[error("invalid exploration: {0} must be finite and non-negative")]
    InvalidExploration(f64),

    /// Returned when the acquisition grid has fewer than two points.
    #[error("invalid grid size: {0} (at least 2 points are required)")]
    InvalidGridSize(usize),

    /// Returned when a step request reaches a worker before any init request.
    #[error("session has not been initialized")]
    SessionNotInitialized,

    /// Returned when the async worker task fails or its channel closes.
    #[cfg(feature = "async")]
    #[error("async task error: {0}")]
    TaskError(String),
}

pub type Result<T> = core::result::Result<T, Error>;
