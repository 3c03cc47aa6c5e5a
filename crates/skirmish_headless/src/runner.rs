//! Headless game runner implementation.
//!
//! Drives a [`Simulation`] through its run loop and writes JSON lines to an
//! output stream: one per tick, or only the final state.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use skirmish_core::entity::EntityId;
use skirmish_core::simulation::{Simulation, TickEvents};
use skirmish_core::snapshot::WorldSnapshot;

/// Headless runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlessConfig {
    /// Ticks to run before stopping.
    pub ticks: u64,
    /// Output state after every tick (vs only the final state).
    pub every_tick: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            ticks: 60,
            every_tick: false,
        }
    }
}

/// One line of runner output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutput {
    /// Deterministic hash of the state after the tick.
    pub state_hash: u64,
    /// Entities destroyed during the tick.
    pub deaths: Vec<EntityId>,
    /// Entities spawned during the tick.
    pub spawned: Vec<EntityId>,
    /// The world after the tick.
    pub world: WorldSnapshot,
}

impl TickOutput {
    fn capture(sim: &Simulation, events: &TickEvents) -> Self {
        Self {
            state_hash: sim.state_hash(),
            deaths: events.deaths.clone(),
            spawned: events.spawned.clone(),
            world: sim.snapshot(),
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks completed.
    pub ticks: u64,
    /// Final state hash.
    pub state_hash: u64,
    /// Live entities at the end.
    pub entities: usize,
}

/// Headless runner for scenario playback.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRunner {
    config: HeadlessConfig,
}

impl HeadlessRunner {
    /// Create a new headless runner with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with custom configuration.
    pub fn with_config(config: HeadlessConfig) -> Self {
        Self { config }
    }

    /// Run `sim` for the configured number of ticks, writing JSON lines to
    /// `out`.
    ///
    /// The loop is stopped from the observer once the tick budget is spent
    /// or a write fails; the first write error is returned.
    pub fn run<W: Write>(&self, sim: &mut Simulation, out: &mut W) -> io::Result<RunSummary> {
        let target = sim.get_tick().saturating_add(self.config.ticks);
        let every_tick = self.config.every_tick;
        let mut last = None;
        let mut failure = None;

        info!(ticks = self.config.ticks, every_tick, "Headless run starting");

        if self.config.ticks > 0 {
            sim.run_with(|sim, events| {
                if every_tick {
                    if let Err(err) = write_line(&mut *out, &TickOutput::capture(sim, events)) {
                        failure = Some(err);
                        sim.stop();
                        return;
                    }
                } else {
                    last = Some(TickOutput::capture(sim, events));
                }
                if sim.get_tick() >= target {
                    sim.stop();
                }
            });
        }

        if let Some(err) = failure {
            return Err(err);
        }

        if !every_tick {
            let output =
                last.unwrap_or_else(|| TickOutput::capture(sim, &TickEvents::default()));
            write_line(&mut *out, &output)?;
        }
        out.flush()?;

        let summary = RunSummary {
            ticks: sim.get_tick(),
            state_hash: sim.state_hash(),
            entities: sim.world().entities().len(),
        };
        debug!(?summary, "Headless run finished");
        Ok(summary)
    }
}

fn write_line<W: Write>(out: &mut W, output: &TickOutput) -> io::Result<()> {
    serde_json::to_writer(&mut *out, output).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    fn lines(buf: &[u8]) -> Vec<TickOutput> {
        std::str::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_every_tick_output() {
        let mut sim = Scenario::default().build(None).unwrap();
        let runner = HeadlessRunner::with_config(HeadlessConfig {
            ticks: 6,
            every_tick: true,
        });
        let mut buf = Vec::new();
        let summary = runner.run(&mut sim, &mut buf).unwrap();

        assert_eq!(summary.ticks, 6);
        let out = lines(&buf);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0].world.tick, 1);
        assert_eq!(out[5].world.tick, 6);
        assert_eq!(out[5].state_hash, summary.state_hash);
        // The AI barracks finishes its first soldier on tick 6.
        assert_eq!(out[5].spawned.len(), 1);
    }

    #[test]
    fn test_final_only_output() {
        let mut sim = Scenario::default().build(None).unwrap();
        let runner = HeadlessRunner::new();
        let mut buf = Vec::new();
        runner.run(&mut sim, &mut buf).unwrap();

        let out = lines(&buf);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].world.tick, 60);
    }

    #[test]
    fn test_zero_ticks_writes_initial_state() {
        let mut sim = Scenario::default().build(None).unwrap();
        let runner = HeadlessRunner::with_config(HeadlessConfig {
            ticks: 0,
            every_tick: false,
        });
        let mut buf = Vec::new();
        let summary = runner.run(&mut sim, &mut buf).unwrap();

        assert_eq!(summary.ticks, 0);
        let out = lines(&buf);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].world.entities.len(), 2);
    }
}
