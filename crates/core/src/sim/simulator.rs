//! Execution driver: owns the backend and drives exactly one run.
//!
//! The context replaces ambient simulator globals with an explicit object whose
//! lifecycle is `new -> run (once) -> finish`. A run walks the states
//! `Built -> Instantiated -> Running -> Terminated`; any failure leaves the
//! context `Failed` and is returned to the caller unchanged.

use std::fmt;
use std::io::Write;

use serde::Serialize;
use tracing::info;

use crate::board::{Root, SystemDescriptor};
use crate::common::{BackendError, HarnessError, Tick};
use crate::sim::backend::Backend;

/// Announcement written just before the blocking `simulate` call.
pub const BEGIN_BANNER: &str = "Beginning simulation!";

/// Where a context is in its single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing handed to the backend yet.
    Built,
    /// The backend realized the system.
    Instantiated,
    /// Traffic started; `simulate` is in progress or about to be.
    Running,
    /// The run completed and produced a result.
    Terminated,
    /// A lifecycle step failed.
    Failed,
}

impl RunState {
    /// Lower-case state name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Instantiated => "instantiated",
            Self::Running => "running",
            Self::Terminated => "terminated",
            Self::Failed => "failed",
        }
    }
}

/// The stopping point of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Simulated time at which the backend stopped.
    pub tick: Tick,
    /// Why it stopped.
    pub cause: String,
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exiting @ tick {} because {}.", self.tick, self.cause)
    }
}

/// Explicit simulation context around a backend.
#[derive(Debug)]
pub struct SimulationContext<B: Backend> {
    backend: B,
    state: RunState,
}

impl<B: Backend> SimulationContext<B> {
    /// Creates a context that has not run yet.
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            state: RunState::Built,
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// The backend, e.g. to read its statistics after a run.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Tears the context down and returns the backend.
    pub fn finish(self) -> B {
        self.backend
    }

    /// Instantiates `system`, starts traffic, and simulates to completion.
    ///
    /// Writes [`BEGIN_BANNER`] to `out` after traffic starts and before the
    /// blocking simulate call. The caller reports the returned result.
    ///
    /// # Errors
    ///
    /// * `BackendError::InvalidState` if this context already ran.
    /// * Any `BackendError` raised by the backend, unchanged.
    /// * `HarnessError::Io` if writing to `out` fails.
    pub fn run<W: Write + ?Sized>(
        &mut self,
        system: SystemDescriptor,
        out: &mut W,
    ) -> Result<RunResult, HarnessError> {
        if self.state != RunState::Built {
            return Err(BackendError::InvalidState {
                operation: "run",
                state: self.state.name(),
            }
            .into());
        }

        let root = Root::new(system);
        let result = self.drive(&root, out);
        if result.is_err() {
            self.state = RunState::Failed;
        }
        result
    }

    fn drive<W: Write + ?Sized>(&mut self, root: &Root, out: &mut W) -> Result<RunResult, HarnessError> {
        self.backend.instantiate(root)?;
        self.state = RunState::Instantiated;
        info!(target: "memtest::sim", "system instantiated");

        self.backend.start_traffic()?;
        self.state = RunState::Running;
        info!(target: "memtest::sim", generator = %root.system.processor().kind(), "traffic started");

        writeln!(out, "{BEGIN_BANNER}")?;
        out.flush()?;

        let exit = self.backend.simulate()?;
        self.state = RunState::Terminated;

        let result = RunResult {
            tick: self.backend.cur_tick(),
            cause: exit.cause,
        };
        info!(target: "memtest::sim", tick = result.tick, cause = %result.cause, "simulation exited");
        Ok(result)
    }
}
