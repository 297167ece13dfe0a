//! Cache hierarchy validation tests.

use memtest_core::common::{ByteSize, ValidationError};
use memtest_core::components::{CACHE_LINE_BYTES, MesiTwoLevelCacheHierarchy};
use memtest_core::config::CacheHierarchyConfig;

#[test]
fn default_geometry_builds() {
    let caches = MesiTwoLevelCacheHierarchy::new(&CacheHierarchyConfig::default()).unwrap();

    assert_eq!(caches.l1i.num_sets(), 32 * 1024 / (8 * CACHE_LINE_BYTES));
    assert_eq!(caches.l1d.num_sets(), 64);
    assert_eq!(caches.l2.num_sets(), 1024);
    assert_eq!(caches.num_l2_banks, 16);
    assert_eq!(caches.l2_sets_per_bank(), 64);
}

fn rejected_parameter(config: &CacheHierarchyConfig) -> &'static str {
    match MesiTwoLevelCacheHierarchy::new(config).unwrap_err() {
        ValidationError::InvalidParameter {
            component,
            parameter,
            ..
        } => {
            assert_eq!(component, MesiTwoLevelCacheHierarchy::NAME);
            parameter
        }
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn zero_associativity_is_rejected() {
    let config = CacheHierarchyConfig {
        l1i_assoc: 0,
        ..CacheHierarchyConfig::default()
    };
    assert_eq!(rejected_parameter(&config), "l1i_assoc");
}

#[test]
fn size_must_split_into_whole_ways() {
    let config = CacheHierarchyConfig {
        l1d_size: ByteSize::from_bytes(1000),
        ..CacheHierarchyConfig::default()
    };
    assert_eq!(rejected_parameter(&config), "l1d_size");
}

#[test]
fn set_count_must_be_a_power_of_two() {
    let config = CacheHierarchyConfig {
        l2_size: ByteSize::kib(100),
        ..CacheHierarchyConfig::default()
    };
    assert_eq!(rejected_parameter(&config), "l2_size");
}

#[test]
fn bank_count_must_be_a_power_of_two() {
    let config = CacheHierarchyConfig {
        num_l2_banks: 3,
        ..CacheHierarchyConfig::default()
    };
    assert_eq!(rejected_parameter(&config), "num_l2_banks");
}

#[test]
fn banks_cannot_exceed_l2_sets() {
    let config = CacheHierarchyConfig {
        num_l2_banks: 2048,
        ..CacheHierarchyConfig::default()
    };
    assert_eq!(rejected_parameter(&config), "num_l2_banks");
}
