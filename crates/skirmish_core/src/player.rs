//! Players and their membership bookkeeping.
//!
//! A player owns nothing directly: the world's registry owns every entity,
//! and the player keeps id lists for "my units" and "my buildings". The
//! world keeps those lists in step with spawning and destruction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Unique identifier for players, equal to their index in the player list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position of this player in the player list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Who makes decisions for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Commands come from outside the simulation.
    #[default]
    Human,
    /// The AI policy decides every tick.
    Ai,
}

/// A participant in the skirmish.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    controller: Controller,
    resources: u32,
    units: Vec<EntityId>,
    buildings: Vec<EntityId>,
}

impl Player {
    /// Create a player with an empty stockpile.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, controller: Controller) -> Self {
        Self {
            id,
            name: name.into(),
            controller,
            resources: 0,
            units: Vec::new(),
            buildings: Vec::new(),
        }
    }

    /// Player id.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decision maker.
    #[must_use]
    pub const fn controller(&self) -> Controller {
        self.controller
    }

    /// Whether the AI policy drives this player.
    #[must_use]
    pub const fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai)
    }

    /// Stockpiled resources.
    #[must_use]
    pub const fn resources(&self) -> u32 {
        self.resources
    }

    /// Owned units, in the order they joined.
    #[must_use]
    pub fn units(&self) -> &[EntityId] {
        &self.units
    }

    /// Owned buildings, in the order they joined.
    #[must_use]
    pub fn buildings(&self) -> &[EntityId] {
        &self.buildings
    }

    /// Add to the stockpile. Saturates instead of wrapping.
    pub fn add_resources(&mut self, amount: u32) {
        self.resources = self.resources.saturating_add(amount);
    }

    /// Record a unit as owned.
    pub fn add_unit(&mut self, unit: EntityId) {
        debug_assert!(!self.units.contains(&unit), "unit {unit} added twice");
        self.units.push(unit);
    }

    /// Record a building as owned.
    pub fn add_building(&mut self, building: EntityId) {
        debug_assert!(
            !self.buildings.contains(&building),
            "building {building} added twice"
        );
        self.buildings.push(building);
    }

    /// Forget a unit. Returns whether it was a member.
    ///
    /// Removing a non-member means the destruction path ran twice; debug
    /// builds panic, release builds ignore it.
    pub fn remove_unit(&mut self, unit: EntityId) -> bool {
        let removed = remove_id(&mut self.units, unit);
        debug_assert!(removed, "unit {unit} is not owned by {}", self.id);
        removed
    }

    /// Forget a building. Returns whether it was a member.
    pub fn remove_building(&mut self, building: EntityId) -> bool {
        let removed = remove_id(&mut self.buildings, building);
        debug_assert!(removed, "building {building} is not owned by {}", self.id);
        removed
    }
}

/// Remove `id` preserving order of the rest.
fn remove_id(ids: &mut Vec<EntityId>, id: EntityId) -> bool {
    match ids.iter().position(|&other| other == id) {
        Some(index) => {
            ids.remove(index);
            true
        }
        None => false,
    }
}
