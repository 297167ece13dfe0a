//! Simulation backend seam and execution driver.
//!
//! Provides the `Backend` trait a simulation engine implements, the analytic
//! reference backend, and the `SimulationContext` that drives one run through
//! instantiate, start traffic, simulate, and report.

/// Analytic reference backend.
pub mod analytic;
/// The `Backend` trait and exit events.
pub mod backend;
/// Run-once execution driver.
pub mod simulator;

pub use analytic::AnalyticBackend;
pub use backend::{Backend, ExitEvent};
pub use simulator::{RunResult, RunState, SimulationContext};
