//! Entity definitions and the capability model.
//!
//! Every simulated object is an [`Entity`]: a stable id, a position, an
//! optional owner and an [`EntityKind`] tag. Behaviour is selected by
//! matching on the tag; the `as_*` accessors answer "can this entity
//! attack / gather / produce?" without probing.
//!
//! Entities hold no reference back to the world. Anything that needs the
//! world receives it as a parameter.

use serde::{Deserialize, Serialize};

use crate::combat::{Health, Soldier};
use crate::economy::{Miner, ResourceNode};
use crate::math::Vec2Fixed;
use crate::player::PlayerId;
use crate::production::{ProductionQueue, UnitType};
use crate::rules::GameRules;

/// Unique identifier for entities.
///
/// Ids are assigned in increasing order, so sorting by id gives
/// registration order.
pub type EntityId = u64;

/// Unit-specific capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Can attack.
    Soldier(Soldier),
    /// Can gather.
    Miner(Miner),
}

/// A mobile combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Hit points.
    pub health: Health,
    /// What this unit can do.
    pub kind: UnitKind,
}

impl Unit {
    /// Build a fresh unit of the given type.
    #[must_use]
    pub fn from_type(unit_type: UnitType, rules: &GameRules) -> Self {
        let kind = match unit_type {
            UnitType::Soldier => UnitKind::Soldier(Soldier::from_rules(&rules.soldier)),
            UnitType::Miner => UnitKind::Miner(Miner::from_rules(&rules.miner)),
        };
        Self {
            health: Health::new(rules.unit_health),
            kind,
        }
    }

    /// The type this unit was built as.
    #[must_use]
    pub const fn unit_type(&self) -> UnitType {
        match self.kind {
            UnitKind::Soldier(_) => UnitType::Soldier,
            UnitKind::Miner(_) => UnitType::Miner,
        }
    }
}

/// Building types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    /// Produces units.
    Barracks,
    /// A plain structure with no production.
    Structure,
}

/// Building-specific capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Produces units from its queue.
    Barracks(ProductionQueue),
    /// No capabilities beyond having health.
    Structure,
}

/// A stationary combatant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Building {
    /// Hit points.
    pub health: Health,
    /// What this building can do.
    pub kind: BuildingKind,
}

impl Building {
    /// Build a fresh building of the given type.
    #[must_use]
    pub fn from_type(building_type: BuildingType, rules: &GameRules) -> Self {
        let kind = match building_type {
            BuildingType::Barracks => {
                BuildingKind::Barracks(ProductionQueue::new(rules.production_interval))
            }
            BuildingType::Structure => BuildingKind::Structure,
        };
        Self {
            health: Health::new(rules.building_health),
            kind,
        }
    }

    /// The type this building was built as.
    #[must_use]
    pub const fn building_type(&self) -> BuildingType {
        match self.kind {
            BuildingKind::Barracks(_) => BuildingType::Barracks,
            BuildingKind::Structure => BuildingType::Structure,
        }
    }
}

/// Variant tag for every simulated object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A unit.
    Unit(Unit),
    /// A building.
    Building(Building),
    /// An unowned resource deposit.
    ResourceNode(ResourceNode),
}

/// A simulated object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// World position.
    pub position: Vec2Fixed,
    /// Owning player. Resource nodes have none.
    pub owner: Option<PlayerId>,
    /// Variant data.
    pub kind: EntityKind,
}

impl Entity {
    /// Create an entity. The id is assigned on registration.
    #[must_use]
    pub const fn new(position: Vec2Fixed, owner: Option<PlayerId>, kind: EntityKind) -> Self {
        Self {
            id: 0,
            position,
            owner,
            kind,
        }
    }

    /// Check if this is a unit.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self.kind, EntityKind::Unit(_))
    }

    /// Check if this is a building.
    #[must_use]
    pub const fn is_building(&self) -> bool {
        matches!(self.kind, EntityKind::Building(_))
    }

    /// Health, if this entity is a combatant.
    #[must_use]
    pub const fn health(&self) -> Option<&Health> {
        match &self.kind {
            EntityKind::Unit(unit) => Some(&unit.health),
            EntityKind::Building(building) => Some(&building.health),
            EntityKind::ResourceNode(_) => None,
        }
    }

    /// Mutable health, if this entity is a combatant.
    pub fn health_mut(&mut self) -> Option<&mut Health> {
        match &mut self.kind {
            EntityKind::Unit(unit) => Some(&mut unit.health),
            EntityKind::Building(building) => Some(&mut building.health),
            EntityKind::ResourceNode(_) => None,
        }
    }

    /// Attack capability.
    #[must_use]
    pub const fn as_soldier(&self) -> Option<&Soldier> {
        match &self.kind {
            EntityKind::Unit(Unit {
                kind: UnitKind::Soldier(soldier),
                ..
            }) => Some(soldier),
            _ => None,
        }
    }

    /// Gather capability.
    #[must_use]
    pub const fn as_miner(&self) -> Option<&Miner> {
        match &self.kind {
            EntityKind::Unit(Unit {
                kind: UnitKind::Miner(miner),
                ..
            }) => Some(miner),
            _ => None,
        }
    }

    /// Mutable gather capability.
    pub fn as_miner_mut(&mut self) -> Option<&mut Miner> {
        match &mut self.kind {
            EntityKind::Unit(Unit {
                kind: UnitKind::Miner(miner),
                ..
            }) => Some(miner),
            _ => None,
        }
    }

    /// Production capability.
    #[must_use]
    pub const fn production_queue(&self) -> Option<&ProductionQueue> {
        match &self.kind {
            EntityKind::Building(Building {
                kind: BuildingKind::Barracks(queue),
                ..
            }) => Some(queue),
            _ => None,
        }
    }

    /// Mutable production capability.
    pub fn production_queue_mut(&mut self) -> Option<&mut ProductionQueue> {
        match &mut self.kind {
            EntityKind::Building(Building {
                kind: BuildingKind::Barracks(queue),
                ..
            }) => Some(queue),
            _ => None,
        }
    }

    /// Resource deposit data.
    #[must_use]
    pub const fn as_resource_node(&self) -> Option<&ResourceNode> {
        match &self.kind {
            EntityKind::ResourceNode(node) => Some(node),
            _ => None,
        }
    }

    /// Mutable resource deposit data.
    pub fn as_resource_node_mut(&mut self) -> Option<&mut ResourceNode> {
        match &mut self.kind {
            EntityKind::ResourceNode(node) => Some(node),
            _ => None,
        }
    }

    /// Short label for logs and snapshots.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match &self.kind {
            EntityKind::Unit(unit) => unit.unit_type().name(),
            EntityKind::Building(building) => match building.building_type() {
                BuildingType::Barracks => "barracks",
                BuildingType::Structure => "structure",
            },
            EntityKind::ResourceNode(_) => "resource_node",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_capabilities() {
        let rules = GameRules::default();
        let soldier = Entity::new(
            Vec2Fixed::ZERO,
            Some(PlayerId::new(0)),
            EntityKind::Unit(Unit::from_type(UnitType::Soldier, &rules)),
        );
        assert!(soldier.as_soldier().is_some());
        assert!(soldier.as_miner().is_none());
        assert!(soldier.production_queue().is_none());
        assert_eq!(soldier.health().unwrap().current, 100);
        assert_eq!(soldier.label(), "soldier");

        let miner = Entity::new(
            Vec2Fixed::ZERO,
            Some(PlayerId::new(0)),
            EntityKind::Unit(Unit::from_type(UnitType::Miner, &rules)),
        );
        assert!(miner.as_soldier().is_none());
        assert_eq!(miner.as_miner().unwrap().capacity, 1000);
    }

    #[test]
    fn test_building_capabilities() {
        let rules = GameRules::default();
        let barracks = Entity::new(
            Vec2Fixed::ZERO,
            Some(PlayerId::new(0)),
            EntityKind::Building(Building::from_type(BuildingType::Barracks, &rules)),
        );
        assert_eq!(barracks.production_queue().unwrap().interval(), 5);
        assert_eq!(barracks.health().unwrap().max, 1000);
        assert!(barracks.as_soldier().is_none());

        let structure = Entity::new(
            Vec2Fixed::ZERO,
            Some(PlayerId::new(0)),
            EntityKind::Building(Building::from_type(BuildingType::Structure, &rules)),
        );
        assert!(structure.production_queue().is_none());
        assert!(structure.is_building());
    }

    #[test]
    fn test_resource_node_is_not_combatant() {
        let node = Entity::new(
            Vec2Fixed::ZERO,
            None,
            EntityKind::ResourceNode(ResourceNode::new(10).unwrap()),
        );
        assert!(node.health().is_none());
        assert_eq!(node.as_resource_node().unwrap().remaining(), 10);
    }
}
