//! Determinism verification across seeds.
//!
//! Builds the same scenario many times per seed, runs every copy on the
//! rayon pool and compares final state hashes. Each simulation stays
//! single-threaded; only independent runs execute in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::scenario::{Scenario, ScenarioError};

/// Configuration for a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// First seed to check.
    pub seed_start: u64,
    /// Number of consecutive seeds.
    pub seeds: u32,
    /// Runs per seed.
    pub runs: u32,
    /// Ticks per run.
    pub ticks: u64,
    /// Maximum parallel runs (0 = use rayon default).
    pub parallel: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            seed_start: 0,
            seeds: 4,
            runs: 3,
            ticks: 300,
            parallel: 0,
        }
    }
}

/// Hashes collected for one seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedResult {
    /// The seed.
    pub seed: u64,
    /// Final state hash of every run, in run order.
    pub hashes: Vec<u64>,
}

impl SeedResult {
    /// Whether every run ended in the same state.
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }
}

/// Results of [`verify_scenario`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Ticks per run.
    pub ticks: u64,
    /// Per-seed results, ordered by seed.
    pub seeds: Vec<SeedResult>,
}

impl VerifyReport {
    /// Whether every seed was deterministic.
    pub fn is_deterministic(&self) -> bool {
        self.seeds.iter().all(SeedResult::is_deterministic)
    }

    /// Seeds whose runs disagreed.
    pub fn divergent_seeds(&self) -> Vec<u64> {
        self.seeds
            .iter()
            .filter(|result| !result.is_deterministic())
            .map(|result| result.seed)
            .collect()
    }
}

/// Run `scenario` `runs` times for each seed and collect final hashes.
pub fn verify_scenario(
    scenario: &Scenario,
    config: &VerifyConfig,
) -> Result<VerifyReport, ScenarioError> {
    let work = || -> Result<VerifyReport, ScenarioError> {
        let jobs: Vec<(u64, u32)> = (0..config.seeds)
            .flat_map(|i| {
                let seed = config.seed_start.wrapping_add(u64::from(i));
                (0..config.runs).map(move |run| (seed, run))
            })
            .collect();

        let hashes: Vec<(u64, u64)> = jobs
            .into_par_iter()
            .map(|(seed, _run)| -> Result<(u64, u64), ScenarioError> {
                let mut sim = scenario.build(Some(seed))?;
                sim.run_for(config.ticks);
                Ok((seed, sim.state_hash()))
            })
            .collect::<Result<_, _>>()?;

        let mut seeds: Vec<SeedResult> = Vec::new();
        for (seed, hash) in hashes {
            match seeds.last_mut() {
                Some(result) if result.seed == seed => result.hashes.push(hash),
                _ => seeds.push(SeedResult {
                    seed,
                    hashes: vec![hash],
                }),
            }
        }

        Ok(VerifyReport {
            ticks: config.ticks,
            seeds,
        })
    };

    info!(
        scenario = %scenario.name,
        seeds = config.seeds,
        runs = config.runs,
        ticks = config.ticks,
        "Verifying determinism"
    );

    let report = if config.parallel > 0 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel)
            .build()
        {
            Ok(pool) => pool.install(work)?,
            Err(err) => {
                warn!(%err, "Falling back to the global thread pool");
                work()?
            }
        }
    } else {
        work()?
    };

    for seed in report.divergent_seeds() {
        warn!(seed, "Runs diverged");
    }
    Ok(report)
}
