//! Headless skirmish runner.
//!
//! Runs the simulation without graphics. JSON goes to stdout, logs to
//! stderr.
//!
//! # Usage
//!
//! ```bash
//! # Play the default scenario and print the final state
//! cargo run -p skirmish_headless -- run
//!
//! # Play a scenario file with a fixed seed, printing every tick
//! cargo run -p skirmish_headless -- run --scenario duel.ron --seed 7 --every-tick
//!
//! # Verify determinism
//! cargo run -p skirmish_headless -- verify --scenario ai_duel --seeds 8 --runs 5
//! ```

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skirmish_headless::{
    runner::{HeadlessConfig, HeadlessRunner},
    scenario::{Scenario, ScenarioError},
    verify::{verify_scenario, VerifyConfig},
};

#[derive(Parser)]
#[command(name = "skirmish_headless")]
#[command(about = "Headless skirmish runner for scenario playback and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single game and print JSON snapshots
    Run {
        /// Scenario file, or a built-in name (default, ai_duel)
        #[arg(short, long, default_value = "default")]
        scenario: String,

        /// Number of ticks to run
        #[arg(short, long, default_value = "60")]
        ticks: u64,

        /// AI seed (overrides the scenario's seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Output state after every tick
        #[arg(long)]
        every_tick: bool,
    },

    /// Verify determinism by running each seed multiple times
    Verify {
        /// Scenario file, or a built-in name (default, ai_duel)
        #[arg(short, long, default_value = "ai_duel")]
        scenario: String,

        /// First seed to verify
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Number of consecutive seeds
        #[arg(long, default_value = "4")]
        seeds: u32,

        /// Number of verification runs per seed
        #[arg(short, long, default_value = "3")]
        runs: u32,

        /// Ticks per run
        #[arg(short, long, default_value = "300")]
        ticks: u64,

        /// Maximum parallel runs (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries JSON
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let command = cli.command.unwrap_or(Commands::Run {
        scenario: "default".to_string(),
        ticks: 60,
        seed: None,
        every_tick: false,
    });

    match command {
        Commands::Run {
            scenario,
            ticks,
            seed,
            every_tick,
        } => cmd_run(&scenario, ticks, seed, every_tick),
        Commands::Verify {
            scenario,
            seed,
            seeds,
            runs,
            ticks,
            parallel,
        } => cmd_verify(
            &scenario,
            VerifyConfig {
                seed_start: seed,
                seeds,
                runs,
                ticks,
                parallel,
            },
        ),
    }
}

/// Resolve a built-in scenario name or load a RON file.
fn load_scenario(name: &str) -> Result<Scenario, ScenarioError> {
    match Scenario::builtin(name) {
        Some(scenario) => Ok(scenario),
        None => Scenario::load(name),
    }
}

/// Run a single game
fn cmd_run(scenario: &str, ticks: u64, seed: Option<u64>, every_tick: bool) -> ExitCode {
    let scenario = match load_scenario(scenario) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sim = match scenario.build(seed) {
        Ok(sim) => sim,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(scenario = %scenario.name, ticks, "Starting run");

    let runner = HeadlessRunner::with_config(HeadlessConfig { ticks, every_tick });
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match runner.run(&mut sim, &mut out) {
        Ok(summary) => {
            tracing::info!(
                ticks = summary.ticks,
                state_hash = summary.state_hash,
                entities = summary.entities,
                "Run complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Verify determinism across seeds
fn cmd_verify(scenario: &str, config: VerifyConfig) -> ExitCode {
    let scenario = match load_scenario(scenario) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let report = match verify_scenario(&scenario, &config) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if report.is_deterministic() {
        eprintln!(
            "PASS: {} seeds x {} runs produced identical results",
            config.seeds, config.runs
        );
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "FAIL: Non-determinism detected for seeds {:?}",
            report.divergent_seeds()
        );
        ExitCode::FAILURE
    }
}
