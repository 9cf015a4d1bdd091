//! Message-driven front end for hosting a session off the caller's thread.
//!
//! The core [`Session`] API is plain method calls. This module layers a
//! request/response protocol on top of it so a host can drive the optimizer
//! through whatever transport it uses (a channel, a queue, an RPC frame):
//!
//! - [`Request::Init`] starts (or restarts) the session and answers with
//!   [`Response::Init`].
//! - [`Request::Step`] runs one optimization step and answers with
//!   [`Response::Step`].
//!
//! [`Worker`] dispatches requests one at a time. Its internal lock covers the
//! whole evaluate → append → refit sequence, so concurrent callers can never
//! observe or cause a half-applied step. A failed request does not touch the
//! current session.
//!
//! With the **`async`** feature, [`WorkerHandle`] runs a `Worker` on a tokio
//! task fed by a bounded channel; every request gets exactly one reply, in
//! submission order.
//!
//! # Examples
//!
//! ```
//! use gp_bayesopt::worker::{Request, Response, Worker};
//!
//! let worker = Worker::new();
//! let init = worker
//!     .handle(Request::Init {
//!         objective_id: "forrester".into(),
//!         initial_samples: 3,
//!     })
//!     .unwrap();
//! assert!(matches!(init, Response::Init(_)));
//!
//! match worker.handle(Request::Step { exploration: 0.01 }).unwrap() {
//!     Response::Step(step) => assert_eq!(step.samples.len(), 4),
//!     Response::Init(_) => unreachable!(),
//! }
//! ```

use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::{InitResult, Session, SessionBuilder, StepResult};

/// A message addressed to a [`Worker`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Request {
    /// Start a new session, replacing any existing one.
    Init {
        /// Catalog identifier, see [`ObjectiveId`](crate::objective::ObjectiveId).
        objective_id: String,
        /// Number of random samples drawn before the first step.
        initial_samples: u32,
    },
    /// Run one optimization step on the current session.
    Step {
        /// Exploration bonus `ξ` for Expected Improvement.
        exploration: f64,
    },
}

/// The reply to a [`Request`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Response {
    /// Reply to [`Request::Init`].
    Init(InitResult),
    /// Reply to [`Request::Step`].
    Step(StepResult),
}

/// Serializes requests against a single optional [`Session`].
pub struct Worker {
    builder: SessionBuilder,
    session: Mutex<Option<Session>>,
}

impl Worker {
    /// Create a worker whose sessions use default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_builder(SessionBuilder::new())
    }

    /// Create a worker that starts every session from `builder`.
    #[must_use]
    pub fn with_builder(builder: SessionBuilder) -> Self {
        Self {
            builder,
            session: Mutex::new(None),
        }
    }

    /// Dispatch one request.
    ///
    /// # Errors
    ///
    /// Returns the error of [`init`](Self::init) or [`step`](Self::step).
    pub fn handle(&self, request: Request) -> Result<Response> {
        match request {
            Request::Init {
                objective_id,
                initial_samples,
            } => self.init(&objective_id, initial_samples).map(Response::Init),
            Request::Step { exploration } => self.step(exploration).map(Response::Step),
        }
    }

    /// Start a new session, replacing the current one on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownObjective`] or any other initialization error;
    /// the previous session, if any, is kept.
    pub fn init(&self, objective_id: &str, initial_samples: u32) -> Result<InitResult> {
        let mut guard = self.session.lock();
        let (session, init) = self
            .builder
            .clone()
            .initialize(objective_id, initial_samples)?;
        *guard = Some(session);
        Ok(init)
    }

    /// Run one step on the current session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotInitialized`] before the first successful
    /// init, and otherwise the errors of [`Session::step`].
    pub fn step(&self, exploration: f64) -> Result<StepResult> {
        let mut guard = self.session.lock();
        let session = guard.as_mut().ok_or(Error::SessionNotInitialized)?;
        session.step(exploration)
    }

    /// Returns `true` once a session has been started.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Completed steps of the current session.
    #[must_use]
    pub fn iteration(&self) -> Option<u32> {
        self.session.lock().as_ref().map(Session::iteration)
    }

    /// A copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Option<Session> {
        self.session.lock().clone()
    }
}

impl Default for Worker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "async")]
pub use self::handle::WorkerHandle;

#[cfg(feature = "async")]
mod handle {
    use std::sync::Arc;

    use tokio::sync::{mpsc, oneshot};

    use super::{Request, Response, Worker};
    use crate::error::{Error, Result};
    use crate::session::{InitResult, StepResult};

    /// Pending requests buffered before `request` starts waiting.
    const QUEUE_DEPTH: usize = 32;

    type Envelope = (Request, oneshot::Sender<Result<Response>>);

    /// Async handle to a [`Worker`] running on a tokio task.
    ///
    /// Cloning the handle shares the same worker. The task stops once every
    /// handle has been dropped.
    #[derive(Clone, Debug)]
    pub struct WorkerHandle {
        tx: mpsc::Sender<Envelope>,
    }

    impl WorkerHandle {
        /// Move `worker` onto a new tokio task.
        ///
        /// Each request is computed on the blocking pool via
        /// [`spawn_blocking`](tokio::task::spawn_blocking), one at a time.
        ///
        /// # Panics
        ///
        /// Panics if called outside a tokio runtime.
        #[must_use]
        pub fn spawn(worker: Worker) -> Self {
            let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_DEPTH);
            let worker = Arc::new(worker);

            tokio::spawn(async move {
                while let Some((request, reply)) = rx.recv().await {
                    let w = Arc::clone(&worker);
                    let result = tokio::task::spawn_blocking(move || w.handle(request))
                        .await
                        .unwrap_or_else(|e| Err(Error::TaskError(e.to_string())));
                    // The requester may have given up waiting.
                    let _ = reply.send(result);
                }
                trace_debug!("worker task stopped");
            });

            Self { tx }
        }

        /// Send a request and wait for its reply.
        ///
        /// # Errors
        ///
        /// Returns [`Error::TaskError`] if the worker task has stopped or
        /// panicked, and otherwise the error produced by the request.
        pub async fn request(&self, request: Request) -> Result<Response> {
            let (reply, rx) = oneshot::channel();
            self.tx
                .send((request, reply))
                .await
                .map_err(|_| Error::TaskError("worker task has stopped".to_owned()))?;
            rx.await.map_err(|e| Error::TaskError(e.to_string()))?
        }

        /// Send [`Request::Init`] and unwrap the reply.
        ///
        /// # Errors
        ///
        /// See [`request`](Self::request).
        pub async fn init(&self, objective_id: &str, initial_samples: u32) -> Result<InitResult> {
            let request = Request::Init {
                objective_id: objective_id.to_owned(),
                initial_samples,
            };
            match self.request(request).await? {
                Response::Init(init) => Ok(init),
                Response::Step(_) => Err(Error::TaskError("mismatched reply".to_owned())),
            }
        }

        /// Send [`Request::Step`] and unwrap the reply.
        ///
        /// # Errors
        ///
        /// See [`request`](Self::request).
        pub async fn step(&self, exploration: f64) -> Result<StepResult> {
            match self.request(Request::Step { exploration }).await? {
                Response::Step(step) => Ok(step),
                Response::Init(_) => Err(Error::TaskError("mismatched reply".to_owned())),
            }
        }
    }
}
