//! Experiment profiles.
//!
//! Two independent experiments share the builder and driver but keep their own
//! generator setup:
//! 1. **Traffic:** A linear or random generator sweeping the whole memory for a fixed duration.
//! 2. **GUPS:** Random read-modify-write updates over a table covering half the memory.

use tracing::info;

use crate::board::{SystemBuilder, SystemDescriptor, build_system};
use crate::common::{ByteSize, HarnessError};
use crate::components::{
    GeneratorKind, GeneratorParams, Hbm2Stack, MesiTwoLevelCacheHierarchy, build_generator,
};
use crate::config::ExperimentConfig;

fn components(
    config: &ExperimentConfig,
) -> Result<(MesiTwoLevelCacheHierarchy, Hbm2Stack), HarnessError> {
    let cache_hierarchy = MesiTwoLevelCacheHierarchy::new(&config.cache)?;
    let memory = Hbm2Stack::new(&config.memory)?;
    Ok((cache_hierarchy, memory))
}

/// Builds the linear/random traffic experiment.
///
/// `max_addr` defaults to the memory size when the configuration leaves it unset.
///
/// # Errors
///
/// Returns `HarnessError::Validation` for an invalid cache or memory geometry, a
/// read percentage outside `[0, 100]`, or an empty address range.
pub fn traffic(config: &ExperimentConfig, kind: GeneratorKind) -> Result<SystemDescriptor, HarnessError> {
    let (cache_hierarchy, memory) = components(config)?;
    let traffic = &config.traffic;
    let max_addr = traffic.max_addr.map_or(memory.get_size(), ByteSize::bytes);

    let params = GeneratorParams {
        duration: Some(traffic.duration),
        rate: Some(traffic.rate),
        min_addr: Some(traffic.min_addr),
        max_addr: Some(max_addr),
        rd_perc: Some(traffic.rd_perc),
        block_size: Some(traffic.block_size),
        ..GeneratorParams::default()
    };
    let generator = build_generator(kind, &params)?;
    info!(target: "memtest::profiles", %kind, rd_perc = traffic.rd_perc, "traffic profile built");

    Ok(SystemBuilder::new()
        .clk_freq(config.board.clk_freq)
        .generator(generator)
        .memory(memory)
        .cache_hierarchy(cache_hierarchy)
        .build()?)
}

/// Builds the GUPS experiment.
///
/// `table_size` defaults to half the memory size.
///
/// # Errors
///
/// Returns `HarnessError::Validation` for an invalid cache or memory geometry or a
/// table too small to hold one element.
pub fn gups(config: &ExperimentConfig) -> Result<SystemDescriptor, HarnessError> {
    let (cache_hierarchy, memory) = components(config)?;
    let gups = &config.gups;
    let table_size = gups
        .table_size
        .unwrap_or_else(|| ByteSize::from_bytes(memory.get_size() / 2));

    let params = GeneratorParams {
        start_addr: Some(gups.start_addr),
        table_size: Some(table_size),
        update_limit: Some(gups.update_limit),
        clk_freq: Some(gups.clk_freq),
        ..GeneratorParams::default()
    };
    let generator = build_generator(GeneratorKind::Gups, &params)?;
    info!(target: "memtest::profiles", %table_size, update_limit = gups.update_limit, "gups profile built");

    Ok(build_system(
        cache_hierarchy,
        memory,
        generator,
        config.board.clk_freq,
    ))
}
