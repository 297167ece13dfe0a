//! Test board composition tests.
//!
//! Verifies slot checking in `SystemBuilder`, order independence, and the
//! `Root` wrapper.

use memtest_core::board::{Root, SystemBuilder, build_system};
use memtest_core::common::{Frequency, ValidationError};
use memtest_core::components::{
    GeneratorDescriptor, GeneratorKind, GeneratorParams, Hbm2Stack, MesiTwoLevelCacheHierarchy,
    build_generator,
};
use memtest_core::config::ExperimentConfig;
use pretty_assertions::assert_eq;

struct Parts {
    clk_freq: Frequency,
    generator: GeneratorDescriptor,
    memory: Hbm2Stack,
    cache_hierarchy: MesiTwoLevelCacheHierarchy,
}

fn parts() -> Parts {
    let config = ExperimentConfig::default();
    let memory = Hbm2Stack::new(&config.memory).unwrap();
    let params = GeneratorParams {
        duration: Some(config.traffic.duration),
        rate: Some(config.traffic.rate),
        max_addr: Some(memory.get_size()),
        rd_perc: Some(50),
        ..GeneratorParams::default()
    };
    Parts {
        clk_freq: config.board.clk_freq,
        generator: build_generator(GeneratorKind::Random, &params).unwrap(),
        memory,
        cache_hierarchy: MesiTwoLevelCacheHierarchy::new(&config.cache).unwrap(),
    }
}

#[test]
fn build_system_places_generator_in_processor_slot() {
    let p = parts();
    let system = build_system(
        p.cache_hierarchy.clone(),
        p.memory.clone(),
        p.generator.clone(),
        p.clk_freq,
    );

    assert_eq!(system.processor(), &p.generator);
    assert_eq!(system.memory(), &p.memory);
    assert_eq!(system.cache_hierarchy(), &p.cache_hierarchy);
    assert_eq!(system.clk_freq(), p.clk_freq);
}

#[test]
fn builder_is_order_independent() {
    let a = parts();
    let forward = SystemBuilder::new()
        .clk_freq(a.clk_freq)
        .generator(a.generator)
        .memory(a.memory)
        .cache_hierarchy(a.cache_hierarchy)
        .build()
        .unwrap();

    let b = parts();
    let reverse = SystemBuilder::new()
        .cache_hierarchy(b.cache_hierarchy)
        .memory(b.memory)
        .generator(b.generator)
        .clk_freq(b.clk_freq)
        .build()
        .unwrap();

    assert_eq!(forward, reverse);
}

#[test]
fn builder_reports_missing_slot() {
    let p = parts();
    let err = SystemBuilder::new()
        .clk_freq(p.clk_freq)
        .generator(p.generator)
        .cache_hierarchy(p.cache_hierarchy)
        .build()
        .unwrap_err();
    assert_eq!(err, ValidationError::MissingComponent("memory"));

    let err = SystemBuilder::new().build().unwrap_err();
    assert!(matches!(err, ValidationError::MissingComponent(_)));
}

#[test]
fn builder_reports_duplicate_slot() {
    let p = parts();
    let second = parts().memory;
    let err = SystemBuilder::new()
        .clk_freq(p.clk_freq)
        .generator(p.generator)
        .memory(p.memory)
        .memory(second)
        .cache_hierarchy(p.cache_hierarchy)
        .build()
        .unwrap_err();
    assert_eq!(err, ValidationError::DuplicateComponent("memory"));
}

#[test]
fn root_is_never_full_system() {
    let p = parts();
    let system = build_system(p.cache_hierarchy, p.memory, p.generator, p.clk_freq);
    let root = Root::new(system.clone());
    assert!(!root.full_system);
    assert_eq!(root.system, system);
}

#[test]
fn system_json_names_component_classes() {
    let p = parts();
    let json = build_system(p.cache_hierarchy, p.memory, p.generator, p.clk_freq)
        .to_json()
        .unwrap();
    assert!(json.contains("\"RandomGenerator\""), "{json}");
    assert!(json.contains("\"5GHz\""), "{json}");
    assert!(json.contains("\"4GiB\""), "{json}");
}
