//! Common types shared by every part of the harness.
//!
//! This module provides:
//! 1. **Units:** Typed byte sizes, frequencies, bandwidths, and simulated durations parsed from unit-suffixed strings.
//! 2. **Ticks:** The backend time unit and its relation to wall-clock seconds.
//! 3. **Errors:** The validation, backend, and harness error taxonomy.

/// Error types for configuration validation and backend failures.
pub mod error;

/// Unit-suffixed quantity types.
pub mod units;

pub use error::{BackendError, HarnessError, ValidationError};
pub use units::{Bandwidth, ByteSize, Frequency, SimTime, TICKS_PER_SECOND, Tick};
