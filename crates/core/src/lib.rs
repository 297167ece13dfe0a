//! Memory-subsystem experiment harness.
//!
//! This crate assembles a simulated test system out of catalog components and
//! drives a single run against a simulation backend. It provides:
//! 1. **Components:** Typed, validated descriptors for the cache hierarchy, the memory stack, and the traffic generators.
//! 2. **Factory:** Generator-kind dispatch and parameter validation (`build_generator`).
//! 3. **Board:** Composition of one of each component plus a clock into a `SystemDescriptor`.
//! 4. **Simulation:** The `Backend` seam, an analytic reference backend, and the run-once `SimulationContext`.
//! 5. **Profiles:** The linear/random traffic experiment and the GUPS experiment.

/// Common types (units, ticks, errors).
pub mod common;
/// Component catalog and generator factory.
pub mod components;
/// Experiment configuration (defaults and JSON loading).
pub mod config;
/// System graph builder (`TestBoard` and `Root`).
pub mod board;
/// Predefined experiment profiles.
pub mod profiles;
/// Backend seam, reference backend, and execution driver.
pub mod sim;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `ExperimentConfig::default()` or load from JSON.
pub use crate::config::ExperimentConfig;
/// Top-level composed system.
pub use crate::board::{Root, SystemDescriptor};
/// Execution driver and its result type.
pub use crate::sim::{RunResult, SimulationContext};
