//! Experiment configuration.
//!
//! This module defines the configuration surface for both experiment profiles. It provides:
//! 1. **Defaults:** The baseline test system (two-level MESI caches, one HBM2 stack, 5 GHz board).
//! 2. **Structures:** One section per component plus the generator parameters of each profile.
//! 3. **Loading:** JSON deserialization where every missing key falls back to its default.
//!
//! Sizes, rates, frequencies and durations are written as unit-suffixed strings
//! (`"32KiB"`, `"256GiB/s"`, `"5GHz"`, `"1ms"`) or bare integers in base units.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{Bandwidth, ByteSize, Frequency, HarnessError, SimTime};

/// Baseline values used when a key is not supplied.
mod defaults {
    use crate::common::{Bandwidth, ByteSize, Frequency, SimTime};

    /// Board clock (5 GHz).
    pub const CLK_FREQ: Frequency = Frequency::ghz(5);

    /// L1 instruction cache capacity (32 KiB).
    pub const L1I_SIZE: ByteSize = ByteSize::kib(32);

    /// L1 instruction cache associativity.
    pub const L1I_ASSOC: u32 = 8;

    /// L1 data cache capacity (32 KiB).
    pub const L1D_SIZE: ByteSize = ByteSize::kib(32);

    /// L1 data cache associativity.
    pub const L1D_ASSOC: u32 = 8;

    /// Shared L2 capacity (256 KiB).
    pub const L2_SIZE: ByteSize = ByteSize::kib(256);

    /// Shared L2 associativity.
    pub const L2_ASSOC: u32 = 4;

    /// Number of L2 banks.
    pub const NUM_L2_BANKS: u32 = 16;

    /// HBM2 stack capacity (4 GiB).
    pub const MEM_SIZE: ByteSize = ByteSize::gib(4);

    /// HBM2 pseudo-channels per stack.
    pub const MEM_PSEUDO_CHANNELS: u32 = 16;

    /// Latency of one memory access (50 ns).
    pub const MEM_ACCESS_LATENCY: SimTime = SimTime::ns(50);

    /// Linear/random generator run length (1 ms).
    pub const TRAFFIC_DURATION: SimTime = SimTime::ms(1);

    /// Linear/random generator injection rate (256 GiB/s).
    pub const TRAFFIC_RATE: Bandwidth = Bandwidth::from_raw(256 << 30);

    /// Linear/random read percentage.
    pub const TRAFFIC_RD_PERC: i64 = 100;

    /// Linear/random request size.
    pub const TRAFFIC_BLOCK_SIZE: u64 = 64;

    /// GUPS update limit.
    pub const GUPS_UPDATE_LIMIT: u64 = 100_000;

    /// GUPS generator clock (5 GHz).
    pub const GUPS_CLK_FREQ: Frequency = Frequency::ghz(5);
}

/// Root configuration for an experiment.
///
/// # Examples
///
/// ```
/// use memtest_core::config::ExperimentConfig;
///
/// let config = ExperimentConfig::from_json_str(r#"{
///     "cache": { "l2_size": "512KiB" },
///     "traffic": { "rd_perc": 50 }
/// }"#).unwrap();
/// assert_eq!(config.cache.l2_size.bytes(), 512 * 1024);
/// assert_eq!(config.cache.l1d_size.bytes(), 32 * 1024);
/// assert_eq!(config.traffic.rd_perc, 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Test board settings
    pub board: BoardConfig,
    /// Cache hierarchy geometry
    pub cache: CacheHierarchyConfig,
    /// Memory stack
    pub memory: MemoryConfig,
    /// Linear/random generator profile
    pub traffic: TrafficConfig,
    /// GUPS generator profile
    pub gups: GupsConfig,
}

impl ExperimentConfig {
    /// Parses a JSON document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::ConfigParse` if the document is not valid JSON or a
    /// value does not parse (e.g. `"32 parsecs"` as a size).
    pub fn from_json_str(json: &str) -> Result<Self, HarnessError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::ConfigIo` if the file cannot be read, or
    /// `HarnessError::ConfigParse` if its contents are invalid.
    pub fn from_path(path: &Path) -> Result<Self, HarnessError> {
        let text = fs::read_to_string(path).map_err(|source| HarnessError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Test board settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board clock frequency
    #[serde(default = "BoardConfig::default_clk_freq")]
    pub clk_freq: Frequency,
}

impl BoardConfig {
    fn default_clk_freq() -> Frequency {
        defaults::CLK_FREQ
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            clk_freq: defaults::CLK_FREQ,
        }
    }
}

/// Two-level cache hierarchy geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheHierarchyConfig {
    /// L1 instruction cache capacity
    #[serde(default = "CacheHierarchyConfig::default_l1i_size")]
    pub l1i_size: ByteSize,

    /// L1 instruction cache associativity
    #[serde(default = "CacheHierarchyConfig::default_l1i_assoc")]
    pub l1i_assoc: u32,

    /// L1 data cache capacity
    #[serde(default = "CacheHierarchyConfig::default_l1d_size")]
    pub l1d_size: ByteSize,

    /// L1 data cache associativity
    #[serde(default = "CacheHierarchyConfig::default_l1d_assoc")]
    pub l1d_assoc: u32,

    /// Shared L2 capacity
    #[serde(default = "CacheHierarchyConfig::default_l2_size")]
    pub l2_size: ByteSize,

    /// Shared L2 associativity
    #[serde(default = "CacheHierarchyConfig::default_l2_assoc")]
    pub l2_assoc: u32,

    /// Number of L2 banks
    #[serde(default = "CacheHierarchyConfig::default_num_l2_banks")]
    pub num_l2_banks: u32,
}

impl CacheHierarchyConfig {
    fn default_l1i_size() -> ByteSize {
        defaults::L1I_SIZE
    }

    fn default_l1i_assoc() -> u32 {
        defaults::L1I_ASSOC
    }

    fn default_l1d_size() -> ByteSize {
        defaults::L1D_SIZE
    }

    fn default_l1d_assoc() -> u32 {
        defaults::L1D_ASSOC
    }

    fn default_l2_size() -> ByteSize {
        defaults::L2_SIZE
    }

    fn default_l2_assoc() -> u32 {
        defaults::L2_ASSOC
    }

    fn default_num_l2_banks() -> u32 {
        defaults::NUM_L2_BANKS
    }
}

impl Default for CacheHierarchyConfig {
    fn default() -> Self {
        Self {
            l1i_size: defaults::L1I_SIZE,
            l1i_assoc: defaults::L1I_ASSOC,
            l1d_size: defaults::L1D_SIZE,
            l1d_assoc: defaults::L1D_ASSOC,
            l2_size: defaults::L2_SIZE,
            l2_assoc: defaults::L2_ASSOC,
            num_l2_banks: defaults::NUM_L2_BANKS,
        }
    }
}

/// Memory stack configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Stack capacity
    #[serde(default = "MemoryConfig::default_size")]
    pub size: ByteSize,

    /// Independent pseudo-channels
    #[serde(default = "MemoryConfig::default_pseudo_channels")]
    pub pseudo_channels: u32,

    /// Latency of one access on one channel
    #[serde(default = "MemoryConfig::default_access_latency")]
    pub access_latency: SimTime,
}

impl MemoryConfig {
    fn default_size() -> ByteSize {
        defaults::MEM_SIZE
    }

    fn default_pseudo_channels() -> u32 {
        defaults::MEM_PSEUDO_CHANNELS
    }

    fn default_access_latency() -> SimTime {
        defaults::MEM_ACCESS_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: defaults::MEM_SIZE,
            pseudo_channels: defaults::MEM_PSEUDO_CHANNELS,
            access_latency: defaults::MEM_ACCESS_LATENCY,
        }
    }
}

/// Linear/random generator profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficConfig {
    /// Time the generator runs for
    #[serde(default = "TrafficConfig::default_duration")]
    pub duration: SimTime,

    /// Injection rate
    #[serde(default = "TrafficConfig::default_rate")]
    pub rate: Bandwidth,

    /// Percentage of reads; validated by the generator factory, not here
    #[serde(default = "TrafficConfig::default_rd_perc")]
    pub rd_perc: i64,

    /// Lowest generated address
    #[serde(default)]
    pub min_addr: u64,

    /// One past the highest generated address (defaults to the memory size)
    #[serde(default)]
    pub max_addr: Option<ByteSize>,

    /// Bytes per request
    #[serde(default = "TrafficConfig::default_block_size")]
    pub block_size: u64,
}

impl TrafficConfig {
    fn default_duration() -> SimTime {
        defaults::TRAFFIC_DURATION
    }

    fn default_rate() -> Bandwidth {
        defaults::TRAFFIC_RATE
    }

    fn default_rd_perc() -> i64 {
        defaults::TRAFFIC_RD_PERC
    }

    fn default_block_size() -> u64 {
        defaults::TRAFFIC_BLOCK_SIZE
    }
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            duration: defaults::TRAFFIC_DURATION,
            rate: defaults::TRAFFIC_RATE,
            rd_perc: defaults::TRAFFIC_RD_PERC,
            min_addr: 0,
            max_addr: None,
            block_size: defaults::TRAFFIC_BLOCK_SIZE,
        }
    }
}

/// GUPS generator profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GupsConfig {
    /// First table address
    #[serde(default)]
    pub start_addr: u64,

    /// Table size (defaults to half the memory size)
    #[serde(default)]
    pub table_size: Option<ByteSize>,

    /// Updates before the generator exits; 0 means four per table element
    #[serde(default = "GupsConfig::default_update_limit")]
    pub update_limit: u64,

    /// Generator clock
    #[serde(default = "GupsConfig::default_clk_freq")]
    pub clk_freq: Frequency,
}

impl GupsConfig {
    fn default_update_limit() -> u64 {
        defaults::GUPS_UPDATE_LIMIT
    }

    fn default_clk_freq() -> Frequency {
        defaults::GUPS_CLK_FREQ
    }
}

impl Default for GupsConfig {
    fn default() -> Self {
        Self {
            start_addr: 0,
            table_size: None,
            update_limit: defaults::GUPS_UPDATE_LIMIT,
            clk_freq: defaults::GUPS_CLK_FREQ,
        }
    }
}
