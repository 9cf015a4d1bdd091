#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Sequential Bayesian optimization of scalar functions. A Gaussian Process
//! with a fixed RBF kernel is fitted to the samples seen so far, and the next
//! point is the maximizer of Expected Improvement over an evenly spaced grid.
//! The crate produces data (samples, posterior curves, acquisition curves)
//! and leaves drawing them to the host.
//!
//! # Getting Started
//!
//! ```
//! use gp_bayesopt::prelude::*;
//!
//! let (mut session, init) = Session::builder()
//!     .seed(42)
//!     .initialize("forrester", 3)
//!     .unwrap();
//! println!("first suggestion: {:.3}", init.suggested_next_x);
//!
//! for _ in 0..10 {
//!     let step = session.step(0.01).unwrap();
//!     println!("iteration {}: sampled x = {:.4}", step.iteration, step.next_x);
//! }
//!
//! let best = session.best().unwrap();
//! assert_eq!(session.n_samples(), 13);
//! println!("best: f({:.4}) = {:.4}", best.x, best.y);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Session`] | Owns the problem, the samples and the GP; `initialize` then `step`. |
//! | [`Problem`](objective::Problem) | Objective function pointer plus search bounds. |
//! | [`ObjectiveId`](objective::ObjectiveId) | Fixed catalog of benchmark functions. |
//! | [`GaussianProcess`](gp::GaussianProcess) | Surrogate model with posterior mean and variance. |
//! | [`KernelParams`](kernel::KernelParams) | RBF signal variance, length scale and noise variance. |
//! | [`Worker`](worker::Worker) | Request/response dispatcher for hosting a session behind a transport. |
//!
//! # Numerical robustness
//!
//! The covariance factorization in [`linalg::cholesky`] never fails: a
//! non-positive pivot is replaced by `sqrt(|pivot| + 1e-6)`. Duplicate or
//! nearly duplicate samples therefore distort the posterior slightly instead
//! of aborting the run.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `async` | [`WorkerHandle`](worker::WorkerHandle): a worker on a tokio task | off |
//! | `serde` | `Serialize`/`Deserialize` on payloads, requests and responses | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) for fits and steps | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

pub mod acquisition;
mod error;
pub mod gp;
pub mod kernel;
pub mod linalg;
pub mod objective;
pub mod session;
pub mod worker;

pub use error::{Error, Result};
pub use session::{InitResult, Sample, Session, SessionBuilder, StepResult};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use gp_bayesopt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{DEFAULT_GRID_SIZE, expected_improvement};
    pub use crate::error::{Error, Result};
    pub use crate::gp::{GaussianProcess, PosteriorResult};
    pub use crate::kernel::KernelParams;
    pub use crate::objective::{ObjectiveId, Problem};
    pub use crate::session::{InitResult, Sample, Session, SessionBuilder, StepResult};
    #[cfg(feature = "async")]
    pub use crate::worker::WorkerHandle;
    pub use crate::worker::{Request, Response, Worker};
}
