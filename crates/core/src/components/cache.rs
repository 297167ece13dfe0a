//! Two-level MESI cache hierarchy descriptor.
//!
//! Private L1 instruction and data caches in front of a banked, shared L2. The
//! coherence protocol itself lives in the backend; this descriptor only carries
//! the geometry and checks that it describes a buildable cache.

use serde::Serialize;
use tracing::debug;

use crate::common::{ByteSize, ValidationError};
use crate::config::CacheHierarchyConfig;

/// Cache line size in bytes shared by every level.
pub const CACHE_LINE_BYTES: u64 = 64;

/// Geometry of one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheLevel {
    /// Total capacity.
    pub size: ByteSize,
    /// Number of ways per set.
    pub assoc: u32,
}

impl CacheLevel {
    /// Number of sets (`size / (assoc * line)`).
    pub const fn num_sets(&self) -> u64 {
        self.size.bytes() / (self.assoc as u64 * CACHE_LINE_BYTES)
    }

    fn validate(
        size: ByteSize,
        assoc: u32,
        size_param: &'static str,
        assoc_param: &'static str,
    ) -> Result<Self, ValidationError> {
        if assoc == 0 {
            return Err(invalid(assoc_param, "associativity must be at least 1".into()));
        }
        let way_bytes = assoc as u64 * CACHE_LINE_BYTES;
        if size.bytes() == 0 || size.bytes() % way_bytes != 0 {
            return Err(invalid(
                size_param,
                format!("{size} is not a non-zero multiple of {assoc} ways x {CACHE_LINE_BYTES}B lines"),
            ));
        }
        let level = Self { size, assoc };
        if !level.num_sets().is_power_of_two() {
            return Err(invalid(
                size_param,
                format!("{} sets is not a power of two", level.num_sets()),
            ));
        }
        Ok(level)
    }
}

fn invalid(parameter: &'static str, reason: String) -> ValidationError {
    ValidationError::InvalidParameter {
        component: MesiTwoLevelCacheHierarchy::NAME,
        parameter,
        reason,
    }
}

/// Two-level MESI cache hierarchy: split L1, shared banked L2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MesiTwoLevelCacheHierarchy {
    /// L1 instruction cache.
    pub l1i: CacheLevel,
    /// L1 data cache.
    pub l1d: CacheLevel,
    /// Shared L2 cache.
    pub l2: CacheLevel,
    /// Number of L2 banks.
    pub num_l2_banks: u32,
}

impl MesiTwoLevelCacheHierarchy {
    /// Catalog name of this component.
    pub const NAME: &'static str = "MESITwoLevelCacheHierarchy";

    /// Builds the hierarchy from its configuration section.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidParameter` when a level's size is not a
    /// multiple of its way size, its set count is not a power of two, or the L2
    /// bank count is not a power of two no larger than the L2 set count.
    pub fn new(config: &CacheHierarchyConfig) -> Result<Self, ValidationError> {
        let l1i = CacheLevel::validate(config.l1i_size, config.l1i_assoc, "l1i_size", "l1i_assoc")?;
        let l1d = CacheLevel::validate(config.l1d_size, config.l1d_assoc, "l1d_size", "l1d_assoc")?;
        let l2 = CacheLevel::validate(config.l2_size, config.l2_assoc, "l2_size", "l2_assoc")?;

        let banks = config.num_l2_banks;
        if banks == 0 || !banks.is_power_of_two() {
            return Err(invalid(
                "num_l2_banks",
                format!("{banks} is not a non-zero power of two"),
            ));
        }
        if banks as u64 > l2.num_sets() {
            return Err(invalid(
                "num_l2_banks",
                format!("{banks} banks exceed {} L2 sets", l2.num_sets()),
            ));
        }

        debug!(
            target: "memtest::components",
            l1i = %l1i.size, l1d = %l1d.size, l2 = %l2.size, banks,
            "built cache hierarchy"
        );
        Ok(Self {
            l1i,
            l1d,
            l2,
            num_l2_banks: banks,
        })
    }

    /// Number of sets in each L2 bank.
    pub const fn l2_sets_per_bank(&self) -> u64 {
        self.l2.num_sets() / self.num_l2_banks as u64
    }
}
