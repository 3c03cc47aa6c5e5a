//! Core simulation loop.
//!
//! The simulation advances the world one tick at a time. Within a tick the
//! order is fixed:
//!
//! 1. every entity in the registry is updated, in registration order;
//! 2. every player is updated, in player-list order (AI players run the
//!    [`AiPolicy`]).
//!
//! The entity id list is snapshotted when the tick starts. An entity
//! destroyed mid-pass is skipped when its turn comes; an entity spawned
//! mid-pass is first updated on the next tick.
//!
//! # Determinism
//!
//! - Fixed-point positions (see [`crate::math`])
//! - Sorted-id iteration, never raw `HashMap` order
//! - One seeded RNG, owned by the simulation
//!
//! # Example
//!
//! ```
//! use skirmish_core::entity::BuildingType;
//! use skirmish_core::math::Vec2Fixed;
//! use skirmish_core::player::Controller;
//! use skirmish_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new();
//! let p1 = sim.add_player("Player 1", Controller::Human);
//! let barracks = sim
//!     .world_mut()
//!     .spawn_building(p1, BuildingType::Barracks, Vec2Fixed::from_ints(10, 10))
//!     .unwrap();
//! sim.world_mut()
//!     .enqueue(barracks, skirmish_core::production::UnitType::Soldier)
//!     .unwrap();
//!
//! sim.run_for(5);
//! assert_eq!(sim.world().player(p1).unwrap().units().len(), 1);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::ai::AiPolicy;
use crate::combat::DamageEvent;
use crate::entity::EntityId;
use crate::error::Result;
use crate::player::{Controller, PlayerId};
use crate::production::ProductionComplete;
use crate::rules::GameRules;
use crate::snapshot::WorldSnapshot;
use crate::world::World;

/// Events generated during a simulation tick.
///
/// Observers (renderers, loggers, test harnesses) read these after each
/// tick; the simulation itself never looks at them again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Damage dealt by attacks.
    pub damage_events: Vec<DamageEvent>,
    /// Entities destroyed this tick.
    pub deaths: Vec<EntityId>,
    /// Production completions.
    pub production_complete: Vec<ProductionComplete>,
    /// Entities spawned this tick.
    pub spawned: Vec<EntityId>,
}

/// Settings for a new simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Game constants.
    pub rules: GameRules,
    /// Seed for the AI's random source.
    pub seed: u64,
}

/// Shared running flag for [`Simulation::run`].
///
/// Clones share the flag, so a handle can stop the loop from an observer
/// callback or another thread. Stopping only prevents the next tick from
/// starting.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request that the loop stop before its next tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the loop is (or would keep) running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }
}

/// The skirmish simulation.
///
/// Owns the world, the AI policy and the random source the policy draws
/// from.
#[derive(Debug)]
pub struct Simulation {
    /// Current simulation tick.
    tick: u64,
    world: World,
    ai: AiPolicy,
    rng: StdRng,
    running: StopHandle,
}

impl Simulation {
    /// Create an empty simulation with default rules and seed 0.
    ///
    /// ```
    /// use skirmish_core::simulation::Simulation;
    ///
    /// let sim = Simulation::new();
    /// assert_eq!(sim.get_tick(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::build(World::default(), SimulationConfig::default().seed)
    }

    /// Create an empty simulation from validated settings.
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        Ok(Self::build(World::new(config.rules)?, config.seed))
    }

    fn build(world: World, seed: u64) -> Self {
        Self {
            tick: 0,
            world,
            ai: AiPolicy::default(),
            rng: StdRng::seed_from_u64(seed),
            running: StopHandle::default(),
        }
    }

    /// Replace the AI policy used for every AI player.
    #[must_use]
    pub fn with_ai(mut self, ai: AiPolicy) -> Self {
        self.ai = ai;
        self
    }

    /// Get the current tick number.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world, for setup and external commands between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Register a player.
    pub fn add_player(&mut self, name: impl Into<String>, controller: Controller) -> PlayerId {
        self.world.add_player(name, controller)
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> TickEvents {
        self.world.begin_tick();

        let entity_ids = self.world.entities().sorted_ids();
        for id in entity_ids {
            if let Err(err) = self.world.update_entity(id) {
                error!(tick = self.tick, entity = id, %err, "Entity update failed");
            }
        }

        let player_ids: Vec<PlayerId> = self.world.players().iter().map(|p| p.id()).collect();
        for id in player_ids {
            self.update_player(id);
        }

        self.tick += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        self.world.take_events()
    }

    /// Per-player update. Human players are driven from outside.
    fn update_player(&mut self, id: PlayerId) {
        let Some(player) = self.world.player(id) else {
            return;
        };
        match player.controller() {
            Controller::Human => {}
            Controller::Ai => {
                if let Err(err) = self.ai.update(&mut self.world, id, &mut self.rng) {
                    error!(tick = self.tick, player = %id, %err, "AI update failed");
                }
            }
        }
    }

    /// Tick until [`stop`](Self::stop) is called.
    ///
    /// With no observer the only way out is a [`StopHandle`] used from
    /// another thread; see [`run_with`](Self::run_with).
    pub fn run(&mut self) {
        self.run_with(|_, _| {});
    }

    /// Tick until stopped, calling `observer` after every tick.
    ///
    /// The observer may call [`stop`](Self::stop) on the simulation it is
    /// given; the current tick has already finished by then.
    pub fn run_with<F>(&mut self, mut observer: F)
    where
        F: FnMut(&Self, &TickEvents),
    {
        self.running.start();
        info!(tick = self.tick, "Simulation started");

        while self.running.is_running() {
            let events = self.tick();
            observer(self, &events);
        }

        info!(tick = self.tick, "Simulation stopped");
    }

    /// Run at most `max_ticks` ticks, stopping early if asked.
    ///
    /// Returns the number of ticks actually run.
    pub fn run_for(&mut self, max_ticks: u64) -> u64 {
        self.running.start();
        let mut ran = 0;
        while ran < max_ticks && self.running.is_running() {
            self.tick();
            ran += 1;
        }
        self.running.stop();
        ran
    }

    /// Stop the loop before the next tick begins.
    pub fn stop(&self) {
        self.running.stop();
    }

    /// Whether the loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    /// Handle that can stop this simulation from elsewhere.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.running.clone()
    }

    /// Calculate a deterministic hash of the simulation state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        self.world.state_hash() ^ self.tick.rotate_left(32)
    }

    /// Read-only view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.world, self.tick)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BuildingType;
    use crate::math::Vec2Fixed;
    use crate::production::UnitType;

    #[test]
    fn test_simulation_new() {
        let sim = Simulation::new();
        assert_eq!(sim.get_tick(), 0);
        assert!(sim.world().entities().is_empty());
        assert!(!sim.is_running());
    }

    #[test]
    fn test_tick_increments() {
        let mut sim = Simulation::new();
        sim.tick();
        assert_eq!(sim.get_tick(), 1);
        sim.tick();
        assert_eq!(sim.get_tick(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimulationConfig::default();
        config.rules.production_interval = 0;
        assert!(Simulation::with_config(config).is_err());
    }

    #[test]
    fn test_production_spawns_at_offset() {
        let mut sim = Simulation::new();
        let p1 = sim.add_player("Player 1", Controller::Human);
        let barracks = sim
            .world_mut()
            .spawn_building(p1, BuildingType::Barracks, Vec2Fixed::from_ints(10, 10))
            .unwrap();
        sim.world_mut().enqueue(barracks, UnitType::Soldier).unwrap();

        for _ in 0..4 {
            assert!(sim.tick().production_complete.is_empty());
        }
        let events = sim.tick();

        assert_eq!(events.production_complete.len(), 1);
        let done = events.production_complete[0];
        assert_eq!(done.building, barracks);
        assert_eq!(events.spawned, vec![done.unit]);
        let unit = sim.world().entity(done.unit).unwrap();
        assert_eq!(unit.position, Vec2Fixed::from_ints(10, 12));
        assert_eq!(unit.owner, Some(p1));
    }

    #[test]
    fn test_custom_ai_policy_produces_its_unit() {
        let mut sim = Simulation::new().with_ai(AiPolicy::new(UnitType::Miner));
        let ai = sim.add_player("AI", Controller::Ai);
        sim.world_mut()
            .spawn_building(ai, BuildingType::Barracks, Vec2Fixed::ZERO)
            .unwrap();

        // Queued during tick 1, finished on tick 1 + interval.
        sim.run_for(6);

        let units = sim.world().player(ai).unwrap().units().to_vec();
        assert_eq!(units.len(), 1);
        let miner = sim.world().entity(units[0]).unwrap();
        assert!(miner.as_miner().is_some());
        assert_eq!(miner.position, Vec2Fixed::from_ints(0, 2));
    }

    #[test]
    fn test_stop_from_observer_finishes_current_tick() {
        let mut sim = Simulation::new();
        sim.run_with(|sim, _| {
            if sim.get_tick() == 3 {
                sim.stop();
            }
        });
        assert_eq!(sim.get_tick(), 3);
        assert!(!sim.is_running());
    }

    #[test]
    fn test_run_with_stop_handle_from_thread() {
        let mut sim = Simulation::new();
        let handle = sim.stop_handle();
        let stopper = std::thread::spawn(move || {
            while !handle.is_running() {
                std::thread::yield_now();
            }
            handle.stop();
        });
        sim.run();
        stopper.join().unwrap();
        assert!(sim.get_tick() > 0);
    }

    #[test]
    fn test_run_for_counts_ticks() {
        let mut sim = Simulation::new();
        assert_eq!(sim.run_for(7), 7);
        assert_eq!(sim.get_tick(), 7);
        assert!(!sim.is_running());
    }

    #[test]
    fn test_deterministic_hash() {
        let build = || {
            let mut sim = Simulation::with_config(SimulationConfig {
                seed: 42,
                ..SimulationConfig::default()
            })
            .unwrap();
            let p1 = sim.add_player("Player 1", Controller::Ai);
            let p2 = sim.add_player("Player 2", Controller::Ai);
            sim.world_mut()
                .spawn_building(p1, BuildingType::Barracks, Vec2Fixed::from_ints(0, 0))
                .unwrap();
            sim.world_mut()
                .spawn_building(p2, BuildingType::Barracks, Vec2Fixed::from_ints(0, 3))
                .unwrap();
            sim
        };

        let mut sim1 = build();
        let mut sim2 = build();
        sim1.run_for(60);
        sim2.run_for(60);
        assert_eq!(sim1.state_hash(), sim2.state_hash());
    }
}
