//! The entity registry and the commands that mutate it.
//!
//! [`World`] owns every live entity (in [`EntityStorage`]) and every player.
//! All destruction goes through [`World::destroy`], which removes the entity
//! from the registry and from its owner's membership list in one step, so
//! the two can never disagree.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use tracing::{debug, info, trace, warn};

use crate::combat::{AttackOutcome, DamageEvent, DamageOutcome};
use crate::economy::ResourceNode;
use crate::entity::{Building, BuildingType, Entity, EntityId, EntityKind, Unit};
use crate::error::{GameError, Result};
use crate::math::Vec2Fixed;
use crate::player::{Controller, Player, PlayerId};
use crate::production::{ProductionComplete, UnitType};
use crate::rules::GameRules;
use crate::simulation::TickEvents;

/// Storage for all entities in the simulation.
///
/// Uses a `HashMap` for O(1) entity lookup by ID, with deterministic
/// iteration via sorted keys when processing a tick.
#[derive(Debug, Clone)]
pub struct EntityStorage {
    /// Map of entity ID to entity data.
    entities: HashMap<EntityId, Entity>,
    /// Next entity ID to assign.
    next_id: EntityId,
}

impl EntityStorage {
    /// Create empty entity storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a new entity and return its ID.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity by ID.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Get an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Get the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get sorted entity IDs, which is registration order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all entities in registration order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &Entity> {
        self.sorted_ids()
            .into_iter()
            .filter_map(move |id| self.entities.get(&id))
    }
}

impl Default for EntityStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Players, entities and rules for one skirmish.
#[derive(Debug, Clone)]
pub struct World {
    rules: GameRules,
    entities: EntityStorage,
    players: Vec<Player>,
    events: TickEvents,
}

impl World {
    /// Create an empty world governed by `rules`.
    ///
    /// Rules are validated first, so every combatant spawns with positive
    /// health and every producing building has a non-zero interval.
    pub fn new(rules: GameRules) -> Result<Self> {
        rules.validate()?;
        Ok(Self::with_valid_rules(rules))
    }

    fn with_valid_rules(rules: GameRules) -> Self {
        Self {
            rules,
            entities: EntityStorage::new(),
            players: Vec::new(),
            events: TickEvents::default(),
        }
    }

    /// Rules in effect.
    #[must_use]
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// The entity registry.
    #[must_use]
    pub const fn entities(&self) -> &EntityStorage {
        &self.entities
    }

    /// Look up a live entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// All players, in update order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .get_mut(id.index())
            .ok_or(GameError::PlayerNotFound(id))
    }

    /// Every player other than `id`.
    pub fn opponents(&self, id: PlayerId) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |player| player.id() != id)
    }

    /// Register a new player and return its ID.
    pub fn add_player(&mut self, name: impl Into<String>, controller: Controller) -> PlayerId {
        let index = u32::try_from(self.players.len()).unwrap_or(u32::MAX);
        let id = PlayerId::new(index);
        let player = Player::new(id, name, controller);
        info!(player = %id, name = player.name(), ?controller, "Player joined");
        self.players.push(player);
        id
    }

    /// Spawn a unit owned by `owner`.
    pub fn spawn_unit(
        &mut self,
        owner: PlayerId,
        unit_type: UnitType,
        position: Vec2Fixed,
    ) -> Result<EntityId> {
        self.player_mut(owner)?;
        let unit = Unit::from_type(unit_type, &self.rules);
        let id = self.entities.insert(Entity::new(
            position,
            Some(owner),
            EntityKind::Unit(unit),
        ));
        self.player_mut(owner)?.add_unit(id);
        self.events.spawned.push(id);
        debug!(entity = id, player = %owner, %unit_type, "Unit spawned");
        Ok(id)
    }

    /// Spawn a building owned by `owner`.
    pub fn spawn_building(
        &mut self,
        owner: PlayerId,
        building_type: BuildingType,
        position: Vec2Fixed,
    ) -> Result<EntityId> {
        self.player_mut(owner)?;
        let building = Building::from_type(building_type, &self.rules);
        let id = self.entities.insert(Entity::new(
            position,
            Some(owner),
            EntityKind::Building(building),
        ));
        self.player_mut(owner)?.add_building(id);
        self.events.spawned.push(id);
        debug!(entity = id, player = %owner, ?building_type, "Building spawned");
        Ok(id)
    }

    /// Spawn an unowned resource node holding `amount`.
    pub fn spawn_resource_node(&mut self, position: Vec2Fixed, amount: u32) -> Result<EntityId> {
        let node = ResourceNode::new(amount)?;
        let id = self.entities.insert(Entity::new(
            position,
            None,
            EntityKind::ResourceNode(node),
        ));
        self.events.spawned.push(id);
        debug!(entity = id, amount, "Resource node spawned");
        Ok(id)
    }

    /// Remove an entity from the registry and from its owner's lists.
    ///
    /// Destroying an entity that is already gone is rejected with
    /// [`GameError::EntityNotFound`].
    pub fn destroy(&mut self, id: EntityId) -> Result<Entity> {
        let entity = self.entities.remove(id).ok_or(GameError::EntityNotFound(id))?;

        if let Some(owner) = entity.owner {
            let player = self.player_mut(owner)?;
            match entity.kind {
                EntityKind::Unit(_) => {
                    player.remove_unit(id);
                }
                EntityKind::Building(_) => {
                    player.remove_building(id);
                }
                EntityKind::ResourceNode(_) => {}
            }
        }

        self.events.deaths.push(id);
        info!(entity = id, kind = entity.label(), owner = ?entity.owner, "Entity destroyed");
        Ok(entity)
    }

    /// Apply damage to a combatant, destroying it when health runs out.
    pub fn take_damage(&mut self, target: EntityId, amount: u32) -> Result<DamageOutcome> {
        let entity = self
            .entities
            .get_mut(target)
            .ok_or(GameError::EntityNotFound(target))?;
        let health = entity
            .health_mut()
            .ok_or(GameError::NotCombatant(target))?;

        let outcome = health.apply_damage(amount)?;
        if outcome.destroyed {
            self.destroy(target)?;
        }
        Ok(outcome)
    }

    /// Have a soldier attack a target.
    ///
    /// Out-of-range and missing targets are no-ops, not errors.
    pub fn attack(&mut self, attacker: EntityId, target: EntityId) -> Result<AttackOutcome> {
        let attacker_entity = self
            .entities
            .get(attacker)
            .ok_or(GameError::EntityNotFound(attacker))?;
        let soldier = *attacker_entity
            .as_soldier()
            .ok_or(GameError::MissingCapability {
                entity: attacker,
                capability: "attack",
            })?;
        let from = attacker_entity.position;

        let Some(target_entity) = self.entities.get(target) else {
            return Ok(AttackOutcome::TargetMissing);
        };
        if target_entity.health().is_none() {
            return Err(GameError::NotCombatant(target));
        }
        if !soldier.can_attack(from, target_entity.position) {
            trace!(attacker, target, "Target out of range");
            return Ok(AttackOutcome::OutOfRange);
        }

        let outcome = self.take_damage(target, soldier.attack_damage)?;
        self.events.damage_events.push(DamageEvent {
            attacker,
            target,
            damage: soldier.attack_damage,
            destroyed: outcome.destroyed,
        });
        Ok(AttackOutcome::Hit {
            remaining: outcome.remaining,
            destroyed: outcome.destroyed,
        })
    }

    /// Have a miner gather from a resource node.
    ///
    /// Returns the amount moved into the miner's load. A node that is gone
    /// or out of reach yields zero. The node is destroyed once empty.
    pub fn gather(&mut self, miner_id: EntityId, node_id: EntityId) -> Result<u32> {
        let miner_entity = self
            .entities
            .get(miner_id)
            .ok_or(GameError::EntityNotFound(miner_id))?;
        let mut miner = *miner_entity
            .as_miner()
            .ok_or(GameError::MissingCapability {
                entity: miner_id,
                capability: "gather",
            })?;
        let from = miner_entity.position;

        let Some(node_entity) = self.entities.get_mut(node_id) else {
            return Ok(0);
        };
        let node_position = node_entity.position;
        let node = node_entity
            .as_resource_node_mut()
            .ok_or(GameError::MissingCapability {
                entity: node_id,
                capability: "be gathered",
            })?;
        if !miner.can_gather(from, node_position) {
            trace!(miner = miner_id, node = node_id, "Node out of reach");
            return Ok(0);
        }

        let gathered = miner.gather_from(node)?;
        let depleted = node.is_depleted();

        if let Some(slot) = self
            .entities
            .get_mut(miner_id)
            .and_then(Entity::as_miner_mut)
        {
            *slot = miner;
        }
        if depleted {
            self.destroy(node_id)?;
        }

        trace!(miner = miner_id, node = node_id, gathered, "Gathered");
        Ok(gathered)
    }

    /// Move a miner's load into its owner's stockpile.
    pub fn unload(&mut self, miner_id: EntityId) -> Result<u32> {
        let entity = self
            .entities
            .get_mut(miner_id)
            .ok_or(GameError::EntityNotFound(miner_id))?;
        let owner = entity.owner;
        let miner = entity
            .as_miner_mut()
            .ok_or(GameError::MissingCapability {
                entity: miner_id,
                capability: "unload",
            })?;
        let amount = miner.unload();

        if let Some(owner) = owner {
            self.player_mut(owner)?.add_resources(amount);
        }
        Ok(amount)
    }

    /// Displace a unit. No pathfinding and no collision.
    pub fn move_unit(&mut self, unit: EntityId, delta: Vec2Fixed) -> Result<Vec2Fixed> {
        let entity = self
            .entities
            .get_mut(unit)
            .ok_or(GameError::EntityNotFound(unit))?;
        if !entity.is_unit() {
            return Err(GameError::MissingCapability {
                entity: unit,
                capability: "move",
            });
        }
        entity.position = entity.position + delta;
        Ok(entity.position)
    }

    /// Queue a unit on a producing building.
    pub fn enqueue(&mut self, building: EntityId, unit_type: UnitType) -> Result<()> {
        let entity = self
            .entities
            .get_mut(building)
            .ok_or(GameError::EntityNotFound(building))?;
        let queue = entity
            .production_queue_mut()
            .ok_or(GameError::MissingCapability {
                entity: building,
                capability: "produce",
            })?;
        queue.enqueue(unit_type);
        trace!(building, %unit_type, queued = queue.len(), "Production queued");
        Ok(())
    }

    /// Run the per-variant update for one entity.
    ///
    /// Entities removed earlier in the same pass are skipped. Only producing
    /// buildings have per-tick behaviour; units and nodes are idle.
    pub(crate) fn update_entity(&mut self, id: EntityId) -> Result<()> {
        let Some(entity) = self.entities.get_mut(id) else {
            return Ok(());
        };
        let position = entity.position;
        let owner = entity.owner;
        let Some(queue) = entity.production_queue_mut() else {
            return Ok(());
        };
        let Some(unit_type) = queue.tick() else {
            return Ok(());
        };

        let Some(owner) = owner else {
            warn!(building = id, "Unowned building finished production");
            return Ok(());
        };
        let unit = self.spawn_unit(owner, unit_type, position + self.rules.spawn_offset)?;
        self.events.production_complete.push(ProductionComplete {
            building: id,
            unit_type,
            unit,
        });
        Ok(())
    }

    /// Clear the event buffer at the start of a tick.
    pub(crate) fn begin_tick(&mut self) {
        self.events = TickEvents::default();
    }

    /// Hand over the events gathered since `begin_tick`.
    pub(crate) fn take_events(&mut self) -> TickEvents {
        std::mem::take(&mut self.events)
    }

    /// Calculate a deterministic hash of entities and players.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.entities.len().hash(&mut hasher);
        for entity in self.entities.iter_sorted() {
            entity.hash(&mut hasher);
        }
        self.players.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::with_valid_rules(GameRules::default())
    }
}
