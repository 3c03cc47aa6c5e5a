//! Scenario loading and configuration.
//!
//! Scenarios define the initial skirmish state for headless runs: the rules,
//! the AI seed, every player with their starting buildings and units, and
//! the neutral resource nodes on the map.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use skirmish_core::entity::BuildingType;
use skirmish_core::error::GameError;
use skirmish_core::math::Vec2Fixed;
use skirmish_core::player::Controller;
use skirmish_core::production::UnitType;
use skirmish_core::rules::GameRules;
use skirmish_core::simulation::{Simulation, SimulationConfig};

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The simulation rejected part of the setup.
    #[error("Invalid scenario setup: {0}")]
    Setup(#[from] GameError),
}

/// A building placed at scenario start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingPlacement {
    /// Building type.
    pub building: BuildingType,
    /// Position (x, y) in world units.
    pub position: (i32, i32),
    /// Units queued before the first tick.
    #[serde(default)]
    pub queue: Vec<UnitType>,
}

impl BuildingPlacement {
    /// Create a placement with an empty queue.
    pub fn new(building: BuildingType, x: i32, y: i32) -> Self {
        Self {
            building,
            position: (x, y),
            queue: Vec::new(),
        }
    }
}

/// Units placed at scenario start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPlacement {
    /// Unit type.
    pub unit: UnitType,
    /// Position (x, y) in world units.
    pub position: (i32, i32),
    /// How many to place at this position.
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

impl UnitPlacement {
    /// Create a placement.
    pub fn new(unit: UnitType, x: i32, y: i32, count: u32) -> Self {
        Self {
            unit,
            position: (x, y),
            count,
        }
    }
}

/// A neutral resource node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePlacement {
    /// Position (x, y) in world units.
    pub position: (i32, i32),
    /// Resources in the node.
    pub amount: u32,
}

/// One player's starting setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Display name.
    pub name: String,
    /// Human players are idle in headless runs unless their buildings
    /// were given a starting queue.
    #[serde(default)]
    pub controller: Controller,
    /// Starting buildings.
    #[serde(default)]
    pub buildings: Vec<BuildingPlacement>,
    /// Starting units.
    #[serde(default)]
    pub units: Vec<UnitPlacement>,
}

/// A complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Seed for the AI's random source.
    #[serde(default)]
    pub seed: u64,
    /// Game constants.
    #[serde(default)]
    pub rules: GameRules,
    /// Players, in update order.
    pub players: Vec<PlayerSetup>,
    /// Neutral resource nodes.
    #[serde(default)]
    pub resource_nodes: Vec<NodePlacement>,
}

impl Default for Scenario {
    /// Two players with one barracks each: a human at (10, 10) and an AI at
    /// (50, 50).
    fn default() -> Self {
        Self {
            name: "Default Skirmish".to_string(),
            description: "Human versus AI, one barracks each".to_string(),
            seed: 0,
            rules: GameRules::default(),
            players: vec![
                PlayerSetup {
                    name: "Player 1".to_string(),
                    controller: Controller::Human,
                    buildings: vec![BuildingPlacement::new(BuildingType::Barracks, 10, 10)],
                    units: Vec::new(),
                },
                PlayerSetup {
                    name: "Player 2".to_string(),
                    controller: Controller::Ai,
                    buildings: vec![BuildingPlacement::new(BuildingType::Barracks, 50, 50)],
                    units: Vec::new(),
                },
            ],
            resource_nodes: Vec::new(),
        }
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Two AI players whose barracks sit close enough for their soldiers to
    /// fight, plus a contested resource node.
    #[must_use]
    pub fn ai_duel() -> Self {
        Self {
            name: "AI Duel".to_string(),
            description: "Two AIs, barracks one tile apart".to_string(),
            seed: 0,
            rules: GameRules::default(),
            players: vec![
                PlayerSetup {
                    name: "North".to_string(),
                    controller: Controller::Ai,
                    buildings: vec![BuildingPlacement::new(BuildingType::Barracks, 0, 0)],
                    units: vec![UnitPlacement::new(UnitType::Miner, 4, 0, 1)],
                },
                PlayerSetup {
                    name: "South".to_string(),
                    controller: Controller::Ai,
                    buildings: vec![BuildingPlacement::new(BuildingType::Barracks, 0, 1)],
                    units: vec![UnitPlacement::new(UnitType::Miner, 4, 1, 1)],
                },
            ],
            resource_nodes: vec![NodePlacement {
                position: (5, 0),
                amount: 5000,
            }],
        }
    }

    /// Look up a built-in scenario by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "ai_duel" => Some(Self::ai_duel()),
            _ => None,
        }
    }

    /// Build a fresh simulation from this scenario.
    ///
    /// `seed` overrides the scenario's own seed when given.
    pub fn build(&self, seed: Option<u64>) -> Result<Simulation, ScenarioError> {
        let mut sim = Simulation::with_config(SimulationConfig {
            rules: self.rules,
            seed: seed.unwrap_or(self.seed),
        })?;

        for setup in &self.players {
            let player = sim.add_player(setup.name.clone(), setup.controller);
            let world = sim.world_mut();

            for placement in &setup.buildings {
                let (x, y) = placement.position;
                let id =
                    world.spawn_building(player, placement.building, Vec2Fixed::from_ints(x, y))?;
                for &unit_type in &placement.queue {
                    world.enqueue(id, unit_type)?;
                }
            }

            for placement in &setup.units {
                let (x, y) = placement.position;
                for _ in 0..placement.count {
                    world.spawn_unit(player, placement.unit, Vec2Fixed::from_ints(x, y))?;
                }
            }
        }

        for node in &self.resource_nodes {
            let (x, y) = node.position;
            sim.world_mut()
                .spawn_resource_node(Vec2Fixed::from_ints(x, y), node.amount)?;
        }

        debug!(
            scenario = %self.name,
            players = self.players.len(),
            entities = sim.world().entities().len(),
            "Scenario built"
        );
        Ok(sim)
    }
}
