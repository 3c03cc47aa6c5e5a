//! Combatant health and attack resolution.
//!
//! Units and buildings carry [`Health`]. Soldiers deal flat damage to any
//! combatant within range. The world applies the outcome and performs the
//! destruction; this module only decides what happens.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::{GameError, Result};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::rules::SoldierRules;

/// Health component for combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    /// Current hit points. Never drops below zero.
    pub current: i32,
    /// Hit points at spawn.
    pub max: i32,
}

impl Health {
    /// Create full health.
    #[must_use]
    pub const fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Whether this combatant should be destroyed.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current <= 0
    }

    /// Subtract damage and report the result.
    ///
    /// Zero damage is a caller error. The caller must not damage a combatant
    /// that is already dead; the world guarantees this by destroying dead
    /// combatants immediately.
    pub fn apply_damage(&mut self, amount: u32) -> Result<DamageOutcome> {
        if amount == 0 {
            return Err(GameError::InvalidAmount {
                operation: "take_damage",
                amount,
            });
        }
        debug_assert!(!self.is_dead(), "damage applied to a dead combatant");

        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.current = self.current.saturating_sub(amount).max(0);

        Ok(DamageOutcome {
            remaining: self.current,
            destroyed: self.is_dead(),
        })
    }
}

/// Result of applying damage to a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Health left after the hit.
    pub remaining: i32,
    /// Whether the hit destroyed the combatant.
    pub destroyed: bool,
}

/// Soldier capability: flat-damage melee attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Soldier {
    /// Maximum attack distance (inclusive).
    #[serde(with = "fixed_serde")]
    pub attack_range: Fixed,
    /// Damage per successful attack.
    pub attack_damage: u32,
}

impl Soldier {
    /// Create a soldier from the rule set.
    #[must_use]
    pub const fn from_rules(rules: &SoldierRules) -> Self {
        Self {
            attack_range: rules.attack_range,
            attack_damage: rules.attack_damage,
        }
    }

    /// Check whether a target position is within attack range.
    #[must_use]
    pub fn can_attack(&self, from: Vec2Fixed, target: Vec2Fixed) -> bool {
        from.within_range(target, self.attack_range)
    }
}

/// What an attack command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Damage was applied.
    Hit {
        /// Health left on the target.
        remaining: i32,
        /// Whether the target was destroyed.
        destroyed: bool,
    },
    /// Target was farther than the attack range. Nothing happened.
    OutOfRange,
    /// Target no longer exists. Nothing happened.
    TargetMissing,
}

impl AttackOutcome {
    /// Whether the attack dealt damage.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

/// A damage event for the game layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    /// Attacking entity.
    pub attacker: EntityId,
    /// Entity receiving damage.
    pub target: EntityId,
    /// Damage applied.
    pub damage: u32,
    /// Whether the target was destroyed.
    pub destroyed: bool,
}
