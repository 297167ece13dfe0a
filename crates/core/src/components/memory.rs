//! High-bandwidth memory stack descriptor.

use serde::Serialize;
use tracing::debug;

use crate::common::{ByteSize, SimTime, ValidationError};
use crate::config::MemoryConfig;

/// An HBM2 stack: a fixed-capacity device split into independent pseudo-channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hbm2Stack {
    size: ByteSize,
    pseudo_channels: u32,
    access_latency: SimTime,
}

impl Hbm2Stack {
    /// Catalog name of this component.
    pub const NAME: &'static str = "HBM2Stack";

    /// Builds the stack from its configuration section.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidParameter` for a zero capacity, a
    /// pseudo-channel count that is not a power of two, a capacity that does not
    /// split evenly across channels, or a zero access latency.
    pub fn new(config: &MemoryConfig) -> Result<Self, ValidationError> {
        let invalid = |parameter, reason: String| ValidationError::InvalidParameter {
            component: Self::NAME,
            parameter,
            reason,
        };

        if config.size.bytes() == 0 {
            return Err(invalid("size", "capacity must be non-zero".into()));
        }
        let channels = config.pseudo_channels;
        if channels == 0 || !channels.is_power_of_two() {
            return Err(invalid(
                "pseudo_channels",
                format!("{channels} is not a non-zero power of two"),
            ));
        }
        if config.size.bytes() % channels as u64 != 0 {
            return Err(invalid(
                "size",
                format!("{} does not split across {channels} pseudo-channels", config.size),
            ));
        }
        if config.access_latency.ticks() == 0 {
            return Err(invalid("access_latency", "latency must be non-zero".into()));
        }

        debug!(target: "memtest::components", size = %config.size, channels, "built memory stack");
        Ok(Self {
            size: config.size,
            pseudo_channels: channels,
            access_latency: config.access_latency,
        })
    }

    /// Total capacity in bytes.
    pub const fn get_size(&self) -> u64 {
        self.size.bytes()
    }

    /// Total capacity.
    pub const fn size(&self) -> ByteSize {
        self.size
    }

    /// Number of independent pseudo-channels.
    pub const fn pseudo_channels(&self) -> u32 {
        self.pseudo_channels
    }

    /// Latency of a single access on one channel.
    pub const fn access_latency(&self) -> SimTime {
        self.access_latency
    }
}
