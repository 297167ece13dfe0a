//! Backend trait for simulation engines.
//!
//! A backend realizes a composed `Root`, runs it, and reports where and why it
//! stopped. It owns any process-wide simulation state (current tick, object
//! registries); the harness only ever reaches that state through this trait.

use serde::Serialize;

use crate::board::Root;
use crate::common::{BackendError, Tick};
use crate::stats::RunStats;

/// Why `simulate` returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitEvent {
    /// Free-form description of the stopping condition.
    pub cause: String,
}

impl ExitEvent {
    /// Creates an exit event with the given cause.
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    /// The stopping cause.
    pub fn cause(&self) -> &str {
        &self.cause
    }
}

/// A simulation engine.
///
/// Operations are issued exactly once each, in order: `instantiate`,
/// `start_traffic`, `simulate`. `simulate` blocks until the backend decides the
/// run is over; there is no timeout and no cancellation.
pub trait Backend {
    /// Realizes the system graph under `root`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unrealizable` if the configuration cannot be built.
    fn instantiate(&mut self, root: &Root) -> Result<(), BackendError>;

    /// Signals the generator to begin issuing its workload.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidState` if the system is not instantiated.
    fn start_traffic(&mut self) -> Result<(), BackendError>;

    /// Runs until a stopping condition and reports it.
    ///
    /// # Errors
    ///
    /// Returns any fault raised while running.
    fn simulate(&mut self) -> Result<ExitEvent, BackendError>;

    /// Current simulated time.
    fn cur_tick(&self) -> Tick;

    /// Statistics of the finished run, if the backend collects any.
    fn stats(&self) -> Option<RunStats>;
}
