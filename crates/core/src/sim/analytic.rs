//! Analytic reference backend.
//!
//! Realizes a test board without a cycle-level model: it checks that the topology
//! is buildable, then accounts for the generator's workload in closed form. This
//! makes the harness runnable end to end and is fully deterministic. It does not
//! model coherence, queueing, or DRAM timing.
//!
//! * Linear/random generators issue one `block_size` request per
//!   `max(block_size / rate, board clock period)` and stop at `duration`.
//! * GUPS issues one read and one write per update. It finishes after
//!   `max(accesses x generator clock period, accesses x latency / pseudo-channels)`.

use tracing::{debug, info};

use crate::board::Root;
use crate::common::{BackendError, Tick};
use crate::components::generator::GUPS_ELEMENT_BYTES;
use crate::components::{GeneratorDescriptor, GupsGenerator, Hbm2Stack, TrafficGenerator};
use crate::sim::backend::{Backend, ExitEvent};
use crate::stats::RunStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Uninstantiated,
    Instantiated,
    TrafficStarted,
    Exited,
}

impl Phase {
    const fn name(self) -> &'static str {
        match self {
            Self::Uninstantiated => "uninstantiated",
            Self::Instantiated => "instantiated",
            Self::TrafficStarted => "running",
            Self::Exited => "exited",
        }
    }
}

/// Closed-form backend; see the module documentation for the model.
#[derive(Debug, Default)]
pub struct AnalyticBackend {
    phase: Phase,
    root: Option<Root>,
    cur_tick: Tick,
    stats: Option<RunStats>,
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Exit cause reported when a linear or random generator runs out its duration.
pub fn traffic_exit_cause(generator: &TrafficGenerator) -> String {
    format!("{} completed its traffic duration", generator.kind)
}

/// Exit cause reported when GUPS reaches its update limit.
pub const GUPS_EXIT_CAUSE: &str = "GUPSGenerator is finished updating the memory";

fn account_traffic(generator: &TrafficGenerator, clock_period: Tick) -> (Tick, RunStats) {
    let period = generator
        .rate
        .transfer_ticks(generator.block_size)
        .max(clock_period)
        .max(1);
    let duration = generator.duration.ticks();
    let requests = duration / period;
    let reads = saturate(requests as u128 * generator.rd_perc as u128 / 100);
    let writes = requests - reads;

    debug!(target: "memtest::sim", period, requests, "linear/random request stream");
    let stats = RunStats {
        generator: generator.kind.class_name().to_string(),
        sim_ticks: duration,
        requests,
        reads,
        writes,
        bytes_read: saturate(reads as u128 * generator.block_size as u128),
        bytes_written: saturate(writes as u128 * generator.block_size as u128),
        gups_updates: 0,
    };
    (duration, stats)
}

fn account_gups(generator: &GupsGenerator, memory: &Hbm2Stack) -> (Tick, RunStats) {
    let updates = generator.effective_updates();
    let accesses = updates as u128 * 2;
    let issue = accesses * generator.clk_freq.period() as u128;
    let service = (accesses * memory.access_latency().ticks() as u128)
        .div_ceil(memory.pseudo_channels() as u128);
    let ticks = saturate(issue.max(service));

    debug!(target: "memtest::sim", updates, issue = saturate(issue), service = saturate(service), "gups update stream");
    let bytes = saturate(updates as u128 * GUPS_ELEMENT_BYTES as u128);
    let stats = RunStats {
        generator: "GUPSGenerator".to_string(),
        sim_ticks: ticks,
        requests: saturate(accesses),
        reads: updates,
        writes: updates,
        bytes_read: bytes,
        bytes_written: bytes,
        gups_updates: updates,
    };
    (ticks, stats)
}

impl AnalyticBackend {
    /// Creates an uninstantiated backend at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    fn expect_phase(&self, expected: Phase, operation: &'static str) -> Result<(), BackendError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(BackendError::InvalidState {
                operation,
                state: self.phase.name(),
            })
        }
    }

    fn check_realizable(root: &Root) -> Result<(), BackendError> {
        if root.full_system {
            return Err(BackendError::Unrealizable(
                "test boards cannot run in full-system mode".to_string(),
            ));
        }
        let system = &root.system;
        let (start, end) = system.processor().address_range();
        let capacity = system.memory().get_size();
        if end > capacity {
            return Err(BackendError::Unrealizable(format!(
                "{} range [{start:#x}, {end:#x}) exceeds the {} memory",
                system.processor().kind(),
                system.memory().size()
            )));
        }
        Ok(())
    }
}

impl Backend for AnalyticBackend {
    fn instantiate(&mut self, root: &Root) -> Result<(), BackendError> {
        self.expect_phase(Phase::Uninstantiated, "instantiate")?;
        Self::check_realizable(root)?;
        self.root = Some(root.clone());
        self.phase = Phase::Instantiated;
        info!(target: "memtest::sim", "analytic backend realized the system");
        Ok(())
    }

    fn start_traffic(&mut self) -> Result<(), BackendError> {
        self.expect_phase(Phase::Instantiated, "start traffic")?;
        self.phase = Phase::TrafficStarted;
        Ok(())
    }

    fn simulate(&mut self) -> Result<ExitEvent, BackendError> {
        self.expect_phase(Phase::TrafficStarted, "simulate")?;
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| BackendError::Fault("no system was instantiated".to_string()))?;
        let system = &root.system;

        let (ticks, stats, cause) = match system.processor() {
            GeneratorDescriptor::Linear(g) | GeneratorDescriptor::Random(g) => {
                let (ticks, stats) = account_traffic(g, system.clk_freq().period());
                (ticks, stats, traffic_exit_cause(g))
            }
            GeneratorDescriptor::Gups(g) => {
                let (ticks, stats) = account_gups(g, system.memory());
                (ticks, stats, GUPS_EXIT_CAUSE.to_string())
            }
        };

        self.cur_tick = self.cur_tick.saturating_add(ticks);
        self.stats = Some(stats);
        self.phase = Phase::Exited;
        Ok(ExitEvent::new(cause))
    }

    fn cur_tick(&self) -> Tick {
        self.cur_tick
    }

    fn stats(&self) -> Option<RunStats> {
        self.stats.clone()
    }
}
