//! Analytic backend tests.
//!
//! Verifies the closed-form tick and traffic accounting, determinism, and the
//! realizability and lifecycle checks.

use memtest_core::board::Root;
use memtest_core::common::{BackendError, ByteSize, HarnessError, SimTime};
use memtest_core::components::GeneratorKind;
use memtest_core::config::ExperimentConfig;
use memtest_core::profiles;
use memtest_core::sim::analytic::GUPS_EXIT_CAUSE;
use memtest_core::sim::simulator::BEGIN_BANNER;
use memtest_core::sim::{AnalyticBackend, Backend, SimulationContext};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{gups_system, init_tracing, run_analytic, traffic_system};

#[test]
fn random_traffic_runs_for_its_duration() {
    let run = run_analytic(traffic_system(GeneratorKind::Random, 50));

    assert_eq!(run.result.tick, 1_000_000_000);
    assert_eq!(
        run.result.cause,
        "RandomGenerator completed its traffic duration"
    );
    assert_eq!(run.stdout, format!("{BEGIN_BANNER}\n"));

    // 64B at 256GiB/s is 233 ticks per request.
    assert_eq!(run.stats.requests, 1_000_000_000 / 233);
    assert_eq!(run.stats.reads, 2_145_922);
    assert_eq!(run.stats.writes, 2_145_923);
    assert_eq!(run.stats.bytes_read, 2_145_922 * 64);
    assert_eq!(run.stats.sim_ticks, run.result.tick);
}

#[rstest]
#[case(0, 0)]
#[case(100, 4_291_845)]
fn read_share_follows_rd_perc(#[case] rd_perc: i64, #[case] reads: u64) {
    let run = run_analytic(traffic_system(GeneratorKind::Linear, rd_perc));
    assert_eq!(run.stats.reads, reads);
    assert_eq!(run.stats.reads + run.stats.writes, run.stats.requests);
    assert_eq!(run.stats.generator, "LinearGenerator");
}

#[test]
fn slow_board_clock_bounds_request_rate() {
    let mut config = ExperimentConfig::default();
    config.board.clk_freq = "1GHz".parse().unwrap();
    let run = run_analytic(profiles::traffic(&config, GeneratorKind::Linear).unwrap());
    assert_eq!(run.stats.requests, 1_000_000);
}

#[test]
fn identical_systems_give_identical_results() {
    let first = run_analytic(traffic_system(GeneratorKind::Random, 50));
    let second = run_analytic(traffic_system(GeneratorKind::Random, 50));
    assert_eq!(first.result, second.result);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn gups_is_bound_by_memory_service_time() {
    let run = run_analytic(gups_system());

    // 200000 accesses x 50ns over 16 pseudo-channels.
    assert_eq!(run.result.tick, 625_000_000);
    assert_eq!(run.result.cause, GUPS_EXIT_CAUSE);
    assert_eq!(run.stats.gups_updates, 100_000);
    assert_eq!(run.stats.requests, 200_000);
}

#[test]
fn gups_is_bound_by_issue_rate_on_fast_memory() {
    let mut config = ExperimentConfig::default();
    config.memory.access_latency = SimTime::ns(1);
    let run = run_analytic(profiles::gups(&config).unwrap());

    // 200000 accesses x 200ps generator period.
    assert_eq!(run.result.tick, 40_000_000);
}

#[test]
fn traffic_range_beyond_memory_is_unrealizable() {
    init_tracing();
    let mut config = ExperimentConfig::default();
    config.traffic.max_addr = Some(ByteSize::gib(8));
    let system = profiles::traffic(&config, GeneratorKind::Linear).unwrap();

    let mut out = Vec::new();
    let mut context = SimulationContext::new(AnalyticBackend::new());
    let err = context.run(system, &mut out).unwrap_err();

    assert!(matches!(
        err,
        HarnessError::Backend(BackendError::Unrealizable(_))
    ));
    assert!(out.is_empty());
}

#[test]
fn full_system_root_is_unrealizable() {
    let root = Root {
        full_system: true,
        system: gups_system(),
    };
    let mut backend = AnalyticBackend::new();
    assert!(matches!(
        backend.instantiate(&root),
        Err(BackendError::Unrealizable(_))
    ));
}

#[test]
fn lifecycle_steps_out_of_order_are_rejected() {
    let mut backend = AnalyticBackend::new();
    assert_eq!(
        backend.simulate(),
        Err(BackendError::InvalidState {
            operation: "simulate",
            state: "uninstantiated",
        })
    );
    assert!(backend.start_traffic().is_err());

    backend.instantiate(&Root::new(gups_system())).unwrap();
    assert!(backend.instantiate(&Root::new(gups_system())).is_err());
    assert!(backend.simulate().is_err());

    backend.start_traffic().unwrap();
    let exit = backend.simulate().unwrap();
    assert_eq!(exit.cause(), GUPS_EXIT_CAUSE);
    assert_eq!(backend.cur_tick(), 625_000_000);
    assert!(backend.simulate().is_err());
}

#[test]
fn no_stats_before_a_run() {
    assert_eq!(AnalyticBackend::new().stats(), None);
    assert_eq!(AnalyticBackend::new().cur_tick(), 0);
}
