//! Traffic generators and the generator factory.
//!
//! This module defines the catalog of synthetic workload sources and the single place
//! where a generator kind is turned into a validated descriptor. It provides:
//! 1. **Kinds:** `GeneratorKind`, parsed from the simulator class names.
//! 2. **Parameters:** `GeneratorParams`, the union of every kind's options.
//! 3. **Descriptors:** `TrafficGenerator` (linear/random) and `GupsGenerator`.
//! 4. **Factory:** `build_generator` and `build_generator_named`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::common::{Bandwidth, ByteSize, Frequency, SimTime, ValidationError};

/// Default request size for linear and random generators.
pub const DEFAULT_BLOCK_SIZE: u64 = 64;

/// Size of one GUPS table element in bytes.
pub const GUPS_ELEMENT_BYTES: u64 = 8;

/// The closed set of generator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GeneratorKind {
    /// Sweeps addresses sequentially from `min_addr` to `max_addr`.
    Linear,
    /// Picks addresses uniformly in `[min_addr, max_addr)`.
    Random,
    /// Giga-updates-per-second random read-modify-write over a table.
    #[serde(rename = "GUPS")]
    Gups,
}

impl GeneratorKind {
    /// All kinds in catalog order.
    pub const ALL: [Self; 3] = [Self::Linear, Self::Random, Self::Gups];

    /// Simulator class name (`"LinearGenerator"`, ...).
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Linear => "LinearGenerator",
            Self::Random => "RandomGenerator",
            Self::Gups => "GUPSGenerator",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl FromStr for GeneratorKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LinearGenerator" | "Linear" => Ok(Self::Linear),
            "RandomGenerator" | "Random" => Ok(Self::Random),
            "GUPSGenerator" | "GUPS" => Ok(Self::Gups),
            other => Err(ValidationError::UnknownGeneratorKind(other.to_string())),
        }
    }
}

/// Options for any generator kind. Each kind reads only the fields it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorParams {
    /// Run length (linear/random).
    pub duration: Option<SimTime>,
    /// Injection rate (linear/random).
    pub rate: Option<Bandwidth>,
    /// Lowest address generated (linear/random, defaults to 0).
    pub min_addr: Option<u64>,
    /// One past the highest address generated (linear/random).
    pub max_addr: Option<u64>,
    /// Percentage of reads, validated into `[0, 100]` (linear/random).
    pub rd_perc: Option<i64>,
    /// Request size (linear/random, defaults to 64 bytes).
    pub block_size: Option<u64>,
    /// First table address (GUPS).
    pub start_addr: Option<u64>,
    /// Table size in bytes (GUPS).
    pub table_size: Option<ByteSize>,
    /// Number of updates before the generator exits; 0 means four per element (GUPS).
    pub update_limit: Option<u64>,
    /// Generator clock (GUPS).
    pub clk_freq: Option<Frequency>,
}

/// A linear or random traffic generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficGenerator {
    /// `Linear` or `Random`.
    pub kind: GeneratorKind,
    /// Time after which the generator stops issuing requests.
    pub duration: SimTime,
    /// Injection rate.
    pub rate: Bandwidth,
    /// Lowest generated address.
    pub min_addr: u64,
    /// One past the highest generated address.
    pub max_addr: u64,
    /// Percentage of requests that are reads.
    pub rd_perc: u8,
    /// Bytes per request.
    pub block_size: u64,
}

/// A GUPS generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GupsGenerator {
    /// First byte of the update table.
    pub start_addr: u64,
    /// Table size in bytes.
    pub table_size: ByteSize,
    /// Updates before exit; 0 means four per element.
    pub update_limit: u64,
    /// Generator clock.
    pub clk_freq: Frequency,
}

impl GupsGenerator {
    /// Number of 8-byte elements in the table.
    pub const fn table_elements(&self) -> u64 {
        self.table_size.bytes() / GUPS_ELEMENT_BYTES
    }

    /// Number of updates the generator will perform.
    pub const fn effective_updates(&self) -> u64 {
        if self.update_limit == 0 {
            4 * self.table_elements()
        } else {
            self.update_limit
        }
    }

    /// One past the last table byte.
    pub const fn end_addr(&self) -> u64 {
        self.start_addr.saturating_add(self.table_size.bytes())
    }
}

/// A configured generator, acting as the processor of the test board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum GeneratorDescriptor {
    /// `LinearGenerator`.
    #[serde(rename = "LinearGenerator")]
    Linear(TrafficGenerator),
    /// `RandomGenerator`.
    #[serde(rename = "RandomGenerator")]
    Random(TrafficGenerator),
    /// `GUPSGenerator`.
    #[serde(rename = "GUPSGenerator")]
    Gups(GupsGenerator),
}

impl GeneratorDescriptor {
    /// Kind of this generator.
    pub const fn kind(&self) -> GeneratorKind {
        match self {
            Self::Linear(_) => GeneratorKind::Linear,
            Self::Random(_) => GeneratorKind::Random,
            Self::Gups(_) => GeneratorKind::Gups,
        }
    }

    /// Address range `[start, end)` the generator touches.
    pub const fn address_range(&self) -> (u64, u64) {
        match self {
            Self::Linear(g) | Self::Random(g) => (g.min_addr, g.max_addr),
            Self::Gups(g) => (g.start_addr, g.end_addr()),
        }
    }
}

/// Checks a read percentage and narrows it.
///
/// # Errors
///
/// Returns `ValidationError::ReadPercentage` carrying `rd_perc` when it is outside `[0, 100]`.
pub fn validate_rd_perc(rd_perc: i64) -> Result<u8, ValidationError> {
    match u8::try_from(rd_perc) {
        Ok(p) if p <= 100 => Ok(p),
        _ => Err(ValidationError::ReadPercentage(rd_perc)),
    }
}

fn require<T: Copy>(
    kind: GeneratorKind,
    value: Option<T>,
    parameter: &'static str,
) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingParameter {
        kind: kind.class_name(),
        parameter,
    })
}

fn invalid(kind: GeneratorKind, parameter: &'static str, reason: String) -> ValidationError {
    ValidationError::InvalidParameter {
        component: kind.class_name(),
        parameter,
        reason,
    }
}

fn build_traffic(
    kind: GeneratorKind,
    params: &GeneratorParams,
) -> Result<TrafficGenerator, ValidationError> {
    let rd_perc = validate_rd_perc(require(kind, params.rd_perc, "rd_perc")?)?;
    let duration = require(kind, params.duration, "duration")?;
    let rate = require(kind, params.rate, "rate")?;
    let max_addr = require(kind, params.max_addr, "max_addr")?;
    let min_addr = params.min_addr.unwrap_or(0);
    let block_size = params.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);

    if max_addr <= min_addr {
        return Err(invalid(
            kind,
            "max_addr",
            format!("{max_addr:#x} is not above min_addr {min_addr:#x}"),
        ));
    }
    if block_size == 0 || !block_size.is_power_of_two() {
        return Err(invalid(
            kind,
            "block_size",
            format!("{block_size} is not a non-zero power of two"),
        ));
    }

    Ok(TrafficGenerator {
        kind,
        duration,
        rate,
        min_addr,
        max_addr,
        rd_perc,
        block_size,
    })
}

fn build_gups(params: &GeneratorParams) -> Result<GupsGenerator, ValidationError> {
    let kind = GeneratorKind::Gups;
    let start_addr = require(kind, params.start_addr, "start_addr")?;
    let table_size = require(kind, params.table_size, "table_size")?;
    let update_limit = require(kind, params.update_limit, "update_limit")?;
    let clk_freq = require(kind, params.clk_freq, "clk_freq")?;

    if table_size.bytes() < GUPS_ELEMENT_BYTES {
        return Err(invalid(
            kind,
            "table_size",
            format!("{table_size} holds no {GUPS_ELEMENT_BYTES}-byte element"),
        ));
    }
    if start_addr.checked_add(table_size.bytes()).is_none() {
        return Err(invalid(
            kind,
            "table_size",
            format!("table at {start_addr:#x} overflows the address space"),
        ));
    }

    Ok(GupsGenerator {
        start_addr,
        table_size,
        update_limit,
        clk_freq,
    })
}

/// Validates `params` for `kind` and returns the generator descriptor.
///
/// Linear and random generators need `duration`, `rate`, `max_addr` and `rd_perc`;
/// GUPS needs `start_addr`, `table_size`, `update_limit` and `clk_freq`. Fields the
/// kind does not use are ignored.
///
/// # Errors
///
/// * `ValidationError::ReadPercentage` if `rd_perc` is outside `[0, 100]`.
/// * `ValidationError::MissingParameter` if a required field is absent.
/// * `ValidationError::InvalidParameter` for an empty address range or table.
///
/// # Examples
///
/// ```
/// use memtest_core::components::generator::{build_generator, GeneratorKind, GeneratorParams};
///
/// let params = GeneratorParams {
///     duration: Some("1ms".parse().unwrap()),
///     rate: Some("256GiB/s".parse().unwrap()),
///     max_addr: Some(1 << 30),
///     rd_perc: Some(101),
///     ..Default::default()
/// };
/// let err = build_generator(GeneratorKind::Random, &params).unwrap_err();
/// assert!(err.to_string().contains("101"));
/// ```
pub fn build_generator(
    kind: GeneratorKind,
    params: &GeneratorParams,
) -> Result<GeneratorDescriptor, ValidationError> {
    let descriptor = match kind {
        GeneratorKind::Linear => GeneratorDescriptor::Linear(build_traffic(kind, params)?),
        GeneratorKind::Random => GeneratorDescriptor::Random(build_traffic(kind, params)?),
        GeneratorKind::Gups => GeneratorDescriptor::Gups(build_gups(params)?),
    };
    debug!(target: "memtest::components", %kind, "built generator");
    Ok(descriptor)
}

/// Parses `kind` as a generator class name, then calls [`build_generator`].
///
/// # Errors
///
/// Returns `ValidationError::UnknownGeneratorKind` naming `kind` if it is not in the
/// catalog, and any error from [`build_generator`] otherwise.
pub fn build_generator_named(
    kind: &str,
    params: &GeneratorParams,
) -> Result<GeneratorDescriptor, ValidationError> {
    build_generator(kind.parse()?, params)
}
