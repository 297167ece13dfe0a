//! Experiment profile tests.

use memtest_core::common::{ByteSize, HarnessError, ValidationError};
use memtest_core::components::{GeneratorDescriptor, GeneratorKind};
use memtest_core::config::ExperimentConfig;
use memtest_core::profiles;

#[test]
fn traffic_sweeps_whole_memory_by_default() {
    let system = profiles::traffic(&ExperimentConfig::default(), GeneratorKind::Linear).unwrap();
    assert_eq!(system.processor().kind(), GeneratorKind::Linear);
    assert_eq!(system.processor().address_range(), (0, 4 << 30));
}

#[test]
fn traffic_honours_configured_range_and_rd_perc() {
    let mut config = ExperimentConfig::default();
    config.traffic.max_addr = Some(ByteSize::mib(16));
    config.traffic.rd_perc = 50;

    let system = profiles::traffic(&config, GeneratorKind::Random).unwrap();
    let GeneratorDescriptor::Random(g) = system.processor() else {
        panic!("expected a random generator");
    };
    assert_eq!(g.max_addr, 16 << 20);
    assert_eq!(g.rd_perc, 50);
}

#[test]
fn traffic_rejects_rd_perc_before_building_a_system() {
    let mut config = ExperimentConfig::default();
    config.traffic.rd_perc = 150;

    let err = profiles::traffic(&config, GeneratorKind::Random).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Validation(ValidationError::ReadPercentage(150))
    ));
}

#[test]
fn traffic_with_gups_kind_is_missing_gups_parameters() {
    let err = profiles::traffic(&ExperimentConfig::default(), GeneratorKind::Gups).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Validation(ValidationError::MissingParameter {
            kind: "GUPSGenerator",
            ..
        })
    ));
}

#[test]
fn gups_table_defaults_to_half_the_memory() {
    let system = profiles::gups(&ExperimentConfig::default()).unwrap();
    let GeneratorDescriptor::Gups(g) = system.processor() else {
        panic!("expected a GUPS generator");
    };
    assert_eq!(g.table_size, ByteSize::gib(2));
    assert_eq!(g.update_limit, 100_000);
}

#[test]
fn invalid_memory_geometry_fails_both_profiles() {
    let mut config = ExperimentConfig::default();
    config.memory.pseudo_channels = 3;

    assert!(profiles::traffic(&config, GeneratorKind::Linear).is_err());
    assert!(profiles::gups(&config).is_err());
}
