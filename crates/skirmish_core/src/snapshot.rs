//! Read-only views of the world for observers.
//!
//! A snapshot is plain data captured after a tick. Renderers, the headless
//! runner and tests read it; nothing flows back into the simulation.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};
use crate::math::Vec2Fixed;
use crate::player::{Controller, Player, PlayerId};
use crate::world::World;

/// Production state of a building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Pending requests, head first.
    pub pending: Vec<String>,
    /// Ticks accumulated toward the head.
    pub progress: u32,
    /// Ticks per unit.
    pub interval: u32,
}

/// One entity as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity id.
    pub id: EntityId,
    /// Short type label ("soldier", "barracks", ...).
    pub kind: String,
    /// Owning player.
    pub owner: Option<PlayerId>,
    /// Position.
    pub position: Vec2Fixed,
    /// Current health, for combatants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
    /// Production queue, for producing buildings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueSnapshot>,
    /// Carried load, for miners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<u32>,
    /// Remaining amount, for resource nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

impl EntitySnapshot {
    fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.label().to_string(),
            owner: entity.owner,
            position: entity.position,
            health: entity.health().map(|h| h.current),
            queue: entity.production_queue().map(|queue| QueueSnapshot {
                pending: queue.pending().map(|t| t.name().to_string()).collect(),
                progress: queue.progress(),
                interval: queue.interval(),
            }),
            load: entity.as_miner().map(|miner| miner.current_load),
            remaining: entity.as_resource_node().map(|node| node.remaining()),
        }
    }
}

/// One player as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Decision maker.
    pub controller: Controller,
    /// Stockpiled resources.
    pub resources: u32,
    /// Owned unit ids.
    pub units: Vec<EntityId>,
    /// Owned building ids.
    pub buildings: Vec<EntityId>,
}

impl PlayerSnapshot {
    fn from_player(player: &Player) -> Self {
        Self {
            id: player.id(),
            name: player.name().to_string(),
            controller: player.controller(),
            resources: player.resources(),
            units: player.units().to_vec(),
            buildings: player.buildings().to_vec(),
        }
    }
}

/// The whole world after a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Ticks completed.
    pub tick: u64,
    /// Live entities in registration order.
    pub entities: Vec<EntitySnapshot>,
    /// Players in update order.
    pub players: Vec<PlayerSnapshot>,
}

impl WorldSnapshot {
    /// Capture the current state of `world`.
    #[must_use]
    pub fn capture(world: &World, tick: u64) -> Self {
        Self {
            tick,
            entities: world
                .entities()
                .iter_sorted()
                .map(EntitySnapshot::from_entity)
                .collect(),
            players: world.players().iter().map(PlayerSnapshot::from_player).collect(),
        }
    }

    /// Find an entity by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.id == id)
    }
}
