//! Error taxonomy for the harness.
//!
//! This module defines the three error kinds a run can fail with:
//! 1. **Validation:** Malformed or out-of-range configuration, raised before any backend interaction.
//! 2. **Backend:** Failures surfaced by the simulation backend while realizing or running a system.
//! 3. **Harness:** The umbrella type returned by top-level entry points, adding configuration I/O.
//!
//! None of these are recovered from inside the harness; they propagate to the caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A configuration parameter was malformed, out of range, or missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Read percentage outside `[0, 100]`. Carries the rejected value.
    #[error("read percentage has to be an integer number between 0 and 100, got {0}")]
    ReadPercentage(i64),

    /// Generator kind not in the catalog. Carries the rejected name.
    #[error("unknown generator class {0}")]
    UnknownGeneratorKind(String),

    /// A parameter required by the selected generator kind was not supplied.
    #[error("{kind} requires parameter `{parameter}`")]
    MissingParameter {
        /// Generator class name.
        kind: &'static str,
        /// Name of the missing parameter.
        parameter: &'static str,
    },

    /// A unit-suffixed quantity could not be parsed.
    #[error("invalid {expected} {text:?}")]
    InvalidQuantity {
        /// The text as supplied.
        text: String,
        /// What kind of quantity was expected (e.g. `"byte size"`).
        expected: &'static str,
    },

    /// A component parameter parsed but violates the component's constraints.
    #[error("invalid {component} parameter `{parameter}`: {reason}")]
    InvalidParameter {
        /// Component class name.
        component: &'static str,
        /// Parameter name.
        parameter: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },

    /// The system graph is missing a required component slot.
    #[error("system is missing its {0}")]
    MissingComponent(&'static str),

    /// A component slot was supplied more than once.
    #[error("system {0} was supplied more than once")]
    DuplicateComponent(&'static str),
}

/// A failure reported by the simulation backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend cannot realize the requested topology.
    #[error("system is not realizable: {0}")]
    Unrealizable(String),

    /// A lifecycle operation was issued in the wrong state.
    #[error("cannot {operation} while the simulation is {state}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// The state the backend was in.
        state: &'static str,
    },

    /// Internal backend fault.
    #[error("backend fault: {0}")]
    Fault(String),
}

/// Top-level error returned by profile builders and the execution driver.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A configuration file could not be read.
    #[error("unable to read config file {}: {source}", path.display())]
    ConfigIo {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A configuration document could not be parsed.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Writing the run report failed.
    #[error("unable to write report: {0}")]
    Io(#[from] io::Error),
}
