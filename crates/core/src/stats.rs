//! Run statistics collection and reporting.
//!
//! This module records what a finished run did. It provides:
//! 1. **Time:** Simulated ticks and seconds.
//! 2. **Traffic:** Requests issued by the generator, split into reads and writes.
//! 3. **Memory:** Bytes moved and the resulting bandwidth, plus GUPS updates.
//!
//! Reports are written in a `name  value` layout, one statistic per line, grouped
//! into named sections.

use std::io::{self, Write};

use serde::Serialize;

use crate::common::{TICKS_PER_SECOND, Tick};

/// Section names for selective stats output.
///
/// Pass an empty slice to `write_sections` to write all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "traffic", "memory"];

/// Statistics of one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Simulator class name of the generator.
    pub generator: String,
    /// Ticks elapsed when the run stopped.
    pub sim_ticks: Tick,
    /// Requests issued to the memory system.
    pub requests: u64,
    /// Read requests.
    pub reads: u64,
    /// Write requests.
    pub writes: u64,
    /// Bytes read.
    pub bytes_read: u64,
    /// Bytes written.
    pub bytes_written: u64,
    /// Completed read-modify-write updates (GUPS only).
    pub gups_updates: u64,
}

impl RunStats {
    /// Simulated seconds.
    pub fn sim_seconds(&self) -> f64 {
        self.sim_ticks as f64 / TICKS_PER_SECOND as f64
    }

    fn per_second(&self, count: u64) -> f64 {
        let seconds = self.sim_seconds();
        if seconds > 0.0 {
            count as f64 / seconds
        } else {
            0.0
        }
    }

    /// Read bandwidth in bytes per simulated second.
    pub fn read_bandwidth(&self) -> f64 {
        self.per_second(self.bytes_read)
    }

    /// Write bandwidth in bytes per simulated second.
    pub fn write_bandwidth(&self) -> f64 {
        self.per_second(self.bytes_written)
    }

    /// Giga-updates per simulated second.
    pub fn gups(&self) -> f64 {
        self.per_second(self.gups_updates) / 1e9
    }

    /// Writes only the requested sections to `out`.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to write all sections.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn write_sections<W: Write + ?Sized>(&self, out: &mut W, sections: &[&str]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| *x == s);

        writeln!(out, "---------- Begin Simulation Statistics ----------")?;
        if want("summary") {
            writeln!(out, "simTicks                 {}", self.sim_ticks)?;
            writeln!(out, "simSeconds               {:.6}", self.sim_seconds())?;
            writeln!(out, "simFreq                  {TICKS_PER_SECOND}")?;
        }
        if want("traffic") {
            let total = self.requests.max(1) as f64;
            writeln!(out, "generator                {}", self.generator)?;
            writeln!(out, "generator.requests       {}", self.requests)?;
            writeln!(
                out,
                "generator.reads          {} ({:.2}%)",
                self.reads,
                self.reads as f64 / total * 100.0
            )?;
            writeln!(
                out,
                "generator.writes         {} ({:.2}%)",
                self.writes,
                self.writes as f64 / total * 100.0
            )?;
            if self.gups_updates > 0 {
                writeln!(out, "generator.updates        {}", self.gups_updates)?;
                writeln!(out, "generator.gups           {:.6}", self.gups())?;
            }
        }
        if want("memory") {
            writeln!(out, "memory.bytesRead         {}", self.bytes_read)?;
            writeln!(out, "memory.bytesWritten      {}", self.bytes_written)?;
            writeln!(out, "memory.bwRead            {:.2}", self.read_bandwidth())?;
            writeln!(out, "memory.bwWrite           {:.2}", self.write_bandwidth())?;
        }
        writeln!(out, "---------- End Simulation Statistics   ----------")?;
        Ok(())
    }

    /// Writes all sections to `out`.
    ///
    /// Equivalent to `write_sections(out, &[])`.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn write_all<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        self.write_sections(out, &[])
    }
}
