//! Experiment configuration tests.
//!
//! Verifies built-in defaults, partial JSON overrides, and file loading.

use std::io::Write;

use memtest_core::common::{ByteSize, HarnessError, SimTime};
use memtest_core::config::ExperimentConfig;
use pretty_assertions::assert_eq;

#[test]
fn defaults_describe_the_reference_board() {
    let config = ExperimentConfig::default();

    assert_eq!(config.board.clk_freq.hz(), 5_000_000_000);

    assert_eq!(config.cache.l1i_size, ByteSize::kib(32));
    assert_eq!(config.cache.l1i_assoc, 8);
    assert_eq!(config.cache.l1d_size, ByteSize::kib(32));
    assert_eq!(config.cache.l1d_assoc, 8);
    assert_eq!(config.cache.l2_size, ByteSize::kib(256));
    assert_eq!(config.cache.l2_assoc, 4);
    assert_eq!(config.cache.num_l2_banks, 16);

    assert_eq!(config.memory.size, ByteSize::gib(4));
    assert_eq!(config.memory.pseudo_channels, 16);
    assert_eq!(config.memory.access_latency, SimTime::ns(50));

    assert_eq!(config.traffic.duration, SimTime::ms(1));
    assert_eq!(config.traffic.rate.bytes_per_second(), 256 << 30);
    assert_eq!(config.traffic.rd_perc, 100);
    assert_eq!(config.traffic.min_addr, 0);
    assert_eq!(config.traffic.max_addr, None);
    assert_eq!(config.traffic.block_size, 64);

    assert_eq!(config.gups.start_addr, 0);
    assert_eq!(config.gups.table_size, None);
    assert_eq!(config.gups.update_limit, 100_000);
    assert_eq!(config.gups.clk_freq.hz(), 5_000_000_000);
}

#[test]
fn empty_document_is_the_default() {
    assert_eq!(
        ExperimentConfig::from_json_str("{}").unwrap(),
        ExperimentConfig::default()
    );
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let config = ExperimentConfig::from_json_str(
        r#"{
            "memory": { "access_latency": "20ns" },
            "traffic": { "rd_perc": 0, "max_addr": "1GiB" },
            "gups": { "table_size": 4096 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.memory.access_latency, SimTime::ns(20));
    assert_eq!(config.memory.size, ByteSize::gib(4));
    assert_eq!(config.traffic.rd_perc, 0);
    assert_eq!(config.traffic.max_addr, Some(ByteSize::gib(1)));
    assert_eq!(config.traffic.duration, SimTime::ms(1));
    assert_eq!(config.gups.table_size, Some(ByteSize::kib(4)));
}

#[test]
fn out_of_range_rd_perc_is_accepted_by_the_loader() {
    // Range checking belongs to the generator factory.
    let config = ExperimentConfig::from_json_str(r#"{ "traffic": { "rd_perc": 150 } }"#).unwrap();
    assert_eq!(config.traffic.rd_perc, 150);
}

#[test]
fn malformed_quantity_is_a_parse_error() {
    let err = ExperimentConfig::from_json_str(r#"{ "cache": { "l2_size": "32 parsecs" } }"#)
        .unwrap_err();
    assert!(matches!(err, HarnessError::ConfigParse(_)));
    assert!(err.to_string().contains("32 parsecs"), "{err}");
}

#[test]
fn serialized_config_loads_back_unchanged() {
    let mut config = ExperimentConfig::default();
    config.traffic.rd_perc = 25;
    config.gups.table_size = Some(ByteSize::mib(64));

    let json = serde_json::to_string_pretty(&config).unwrap();
    assert_eq!(ExperimentConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "board": {{ "clk_freq": "2GHz" }} }}"#).unwrap();

    let config = ExperimentConfig::from_path(file.path()).unwrap();
    assert_eq!(config.board.clk_freq.period(), 500);
}

#[test]
fn from_path_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = ExperimentConfig::from_path(&path).unwrap_err();
    match err {
        HarnessError::ConfigIo { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ConfigIo, got {other:?}"),
    }
}
