//! Memory-subsystem experiment CLI.
//!
//! This binary runs one experiment per invocation. It performs:
//! 1. **Traffic run:** A linear or random generator against the test board (`memtest traffic <class>`).
//! 2. **GUPS run:** The GUPS update workload against the same board (`memtest gups`).
//!
//! Each run prints `Beginning simulation!` and `Exiting @ tick N because CAUSE.` to
//! stdout. Diagnostics go to stderr; set `RUST_LOG` for more detail.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use memtest_core::common::HarnessError;
use memtest_core::components::GeneratorKind;
use memtest_core::config::ExperimentConfig;
use memtest_core::profiles;
use memtest_core::sim::{AnalyticBackend, Backend, SimulationContext};
use memtest_core::stats::{RunStats, STATS_SECTIONS};

#[derive(Parser, Debug)]
#[command(
    name = "memtest",
    author,
    version,
    about = "A traffic generator that can be used to test a memory component",
    long_about = "Assemble a test board (two-level MESI caches, HBM2 stack, traffic generator as the processor), run it once, and report the exit tick and cause.\n\nExamples:\n  memtest traffic RandomGenerator --rd-perc 50\n  memtest traffic LinearGenerator\n  memtest --stats-file stats.txt --stats-sections summary,memory gups"
)]
struct Cli {
    /// JSON experiment configuration; missing keys use built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write run statistics to this file.
    #[arg(long, global = true)]
    stats_file: Option<PathBuf>,

    /// Comma-separated stats sections to write (default: all).
    #[arg(
        long,
        global = true,
        value_delimiter = ',',
        value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied())
    )]
    stats_sections: Vec<String>,

    /// Write the composed system as JSON to this file before running.
    #[arg(long, global = true)]
    dump_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Generator classes accepted by the traffic experiment.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum GeneratorClass {
    /// Sequential address sweep.
    #[value(name = "LinearGenerator")]
    Linear,
    /// Uniformly random addresses.
    #[value(name = "RandomGenerator")]
    Random,
}

impl From<GeneratorClass> for GeneratorKind {
    fn from(class: GeneratorClass) -> Self {
        match class {
            GeneratorClass::Linear => Self::Linear,
            GeneratorClass::Random => Self::Random,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a linear or random traffic generator for a fixed duration.
    Traffic {
        /// The class of generator to use.
        #[arg(value_enum)]
        generator_class: GeneratorClass,

        /// Percentage of reads (0-100); overrides the config file.
        #[arg(long, allow_negative_numbers = true)]
        rd_perc: Option<i64>,
    },

    /// Run the GUPS update workload.
    Gups,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<ExperimentConfig, HarnessError> {
    match &cli.config {
        Some(path) => {
            tracing::debug!(target: "memtest::cli", path = %path.display(), "loading config");
            ExperimentConfig::from_path(path)
        }
        None => Ok(ExperimentConfig::default()),
    }
}

/// Writes the selected stats sections to `path`; warns and skips when the backend kept none.
fn write_stats(path: &Path, stats: Option<&RunStats>, sections: &[&str]) -> Result<(), HarnessError> {
    let Some(stats) = stats else {
        tracing::warn!(target: "memtest::cli", path = %path.display(), "backend collected no statistics; stats file not written");
        return Ok(());
    };
    let mut file = BufWriter::new(File::create(path)?);
    stats.write_sections(&mut file, sections)?;
    file.flush()?;
    Ok(())
}

/// Builds the selected experiment, runs it once, and reports.
fn run(cli: Cli) -> Result<(), HarnessError> {
    let mut config = load_config(&cli)?;

    let system = match cli.command {
        Commands::Traffic {
            generator_class,
            rd_perc,
        } => {
            if let Some(rd_perc) = rd_perc {
                config.traffic.rd_perc = rd_perc;
            }
            profiles::traffic(&config, generator_class.into())?
        }
        Commands::Gups => profiles::gups(&config)?,
    };

    if let Some(path) = &cli.dump_config {
        fs::write(path, system.to_json()?)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut context = SimulationContext::new(AnalyticBackend::new());
    let result = context.run(system, &mut out)?;
    writeln!(out, "{result}")?;

    if let Some(path) = &cli.stats_file {
        let sections: Vec<&str> = cli.stats_sections.iter().map(String::as_str).collect();
        write_stats(path, context.backend().stats().as_ref(), &sections)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
