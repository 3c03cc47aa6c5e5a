//! Test fixtures and helpers.
//!
//! Pre-built skirmish setups for consistent testing.

use fixed::types::I32F32;
use skirmish_core::entity::{BuildingType, EntityId};
use skirmish_core::math::Vec2Fixed;
use skirmish_core::player::{Controller, PlayerId};
use skirmish_core::production::UnitType;
use skirmish_core::simulation::{Simulation, SimulationConfig};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a position from integer coordinates.
#[must_use]
pub fn pos(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::from_ints(x, y)
}

/// Ids from [`two_barracks_skirmish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skirmish {
    /// First player.
    pub p1: PlayerId,
    /// Second player.
    pub p2: PlayerId,
    /// First player's barracks.
    pub barracks1: EntityId,
    /// Second player's barracks.
    pub barracks2: EntityId,
}

/// The classic setup: two players, one barracks each, far apart.
///
/// Player 1 is human, player 2 is AI. Both barracks get one soldier
/// queued so that human production does not depend on the AI.
#[must_use]
pub fn two_barracks_skirmish(seed: u64) -> (Simulation, Skirmish) {
    let mut sim = Simulation::with_config(SimulationConfig {
        seed,
        ..SimulationConfig::default()
    })
    .expect("default rules are valid");

    let p1 = sim.add_player("Player 1", Controller::Human);
    let p2 = sim.add_player("Player 2", Controller::Ai);
    let world = sim.world_mut();
    let barracks1 = world
        .spawn_building(p1, BuildingType::Barracks, pos(10, 10))
        .expect("player 1 exists");
    let barracks2 = world
        .spawn_building(p2, BuildingType::Barracks, pos(50, 50))
        .expect("player 2 exists");
    world
        .enqueue(barracks1, UnitType::Soldier)
        .expect("barracks produces");

    (
        sim,
        Skirmish {
            p1,
            p2,
            barracks1,
            barracks2,
        },
    )
}

/// Two AI players whose barracks spawn soldiers within reach of each other.
///
/// Spawned soldiers end up one unit apart, so the AIs fight as soon as
/// both have a soldier.
#[must_use]
pub fn close_quarters_skirmish(seed: u64) -> Simulation {
    let mut sim = Simulation::with_config(SimulationConfig {
        seed,
        ..SimulationConfig::default()
    })
    .expect("default rules are valid");

    let p1 = sim.add_player("North", Controller::Ai);
    let p2 = sim.add_player("South", Controller::Ai);
    let world = sim.world_mut();
    world
        .spawn_building(p1, BuildingType::Barracks, pos(0, 0))
        .expect("player exists");
    world
        .spawn_building(p2, BuildingType::Barracks, pos(0, 1))
        .expect("player exists");
    sim
}
