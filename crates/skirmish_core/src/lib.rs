//! # Skirmish Core
//!
//! Deterministic simulation core for a small real-time-strategy skirmish.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO
//! - No unseeded randomness
//! - No floating-point math in the tick (positions are fixed-point)
//!
//! ## Crate Structure
//!
//! - [`entity`] - Entities and the capability model
//! - [`combat`] - Health, damage and attack resolution
//! - [`production`] - Production queues
//! - [`economy`] - Resource nodes and miners
//! - [`player`] - Players and ownership bookkeeping
//! - [`ai`] - Decision policy for computer players
//! - [`world`] - Entity registry and world commands
//! - [`simulation`] - Core simulation loop
//! - [`snapshot`] - Read-only state for observers
//! - [`rules`] - Tunable constants
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod combat;
pub mod economy;
pub mod entity;
pub mod error;
pub mod math;
pub mod player;
pub mod production;
pub mod rules;
pub mod simulation;
pub mod snapshot;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ai::{find_target, AiPolicy, AiReport};
    pub use crate::combat::{AttackOutcome, DamageEvent, DamageOutcome, Health, Soldier};
    pub use crate::economy::{Miner, ResourceNode};
    pub use crate::entity::{
        Building, BuildingKind, BuildingType, Entity, EntityId, EntityKind, Unit, UnitKind,
    };
    pub use crate::error::{GameError, Result};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::player::{Controller, Player, PlayerId};
    pub use crate::production::{ProductionComplete, ProductionQueue, ProductionState, UnitType};
    pub use crate::rules::GameRules;
    pub use crate::simulation::{Simulation, SimulationConfig, StopHandle, TickEvents};
    pub use crate::snapshot::WorldSnapshot;
    pub use crate::world::World;
}
