//! Headless skirmish runner for CI verification and scenario playback.
//!
//! This crate runs the simulation without graphics:
//!
//! - **Scenario playback**: load a RON scenario, run it, and stream JSON
//!   snapshots of the world to stdout
//! - **Determinism checks**: run one scenario many times per seed in
//!   parallel and compare final state hashes
//!
//! # Output
//!
//! - **stdout**: JSON lines (one [`runner::TickOutput`] per line)
//! - **stderr**: logs (human-readable)
//!
//! # Example
//!
//! ```bash
//! # Run the built-in scenario for 100 ticks, one line per tick
//! cargo run -p skirmish_headless -- run --ticks 100 --every-tick
//!
//! # Run a scenario file
//! cargo run -p skirmish_headless -- run --scenario scenarios/duel.ron
//!
//! # Verify determinism over 16 seeds
//! cargo run -p skirmish_headless -- verify --seeds 16 --runs 4
//! ```

pub mod runner;
pub mod scenario;
pub mod verify;

pub use runner::{HeadlessConfig, HeadlessRunner, RunSummary, TickOutput};
pub use scenario::{Scenario, ScenarioError};
pub use verify::{verify_scenario, VerifyConfig, VerifyReport};
