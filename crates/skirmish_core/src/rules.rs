//! Tunable game constants.
//!
//! Every number the simulation uses lives in [`GameRules`]. The defaults
//! reproduce the classic skirmish setup; scenarios can override any field
//! through RON.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Stats for the soldier unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldierRules {
    /// Maximum attack distance (inclusive).
    #[serde(with = "fixed_serde")]
    pub attack_range: Fixed,
    /// Damage dealt per successful attack.
    pub attack_damage: u32,
}

impl Default for SoldierRules {
    fn default() -> Self {
        Self {
            attack_range: Fixed::from_num(1),
            attack_damage: 10,
        }
    }
}

/// Stats for the miner unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerRules {
    /// Maximum load a miner can carry.
    pub capacity: u32,
    /// Amount requested from a node per gather.
    pub gather_rate: u32,
    /// Maximum distance to a node for gathering (inclusive).
    #[serde(with = "fixed_serde")]
    pub gather_range: Fixed,
}

impl Default for MinerRules {
    fn default() -> Self {
        Self {
            capacity: 1000,
            gather_rate: 100,
            gather_range: Fixed::from_num(1),
        }
    }
}

/// The full rule set for one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Starting health for every unit.
    pub unit_health: i32,
    /// Starting health for every building.
    pub building_health: i32,
    /// Soldier stats.
    pub soldier: SoldierRules,
    /// Miner stats.
    pub miner: MinerRules,
    /// Ticks a barracks needs per unit.
    pub production_interval: u32,
    /// Offset from the producing building where new units appear.
    pub spawn_offset: Vec2Fixed,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            unit_health: 100,
            building_health: 1000,
            soldier: SoldierRules::default(),
            miner: MinerRules::default(),
            production_interval: 5,
            spawn_offset: Vec2Fixed::from_ints(0, 2),
        }
    }
}

impl GameRules {
    /// Parse and validate rules from RON text.
    ///
    /// Missing fields fall back to the defaults.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let rules: Self = ron::from_str(text).map_err(|e| GameError::RulesParse(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check that every constant is usable by the simulation.
    pub fn validate(&self) -> Result<()> {
        if self.unit_health <= 0 {
            return Err(GameError::InvalidRules(format!(
                "unit_health must be positive, got {}",
                self.unit_health
            )));
        }
        if self.building_health <= 0 {
            return Err(GameError::InvalidRules(format!(
                "building_health must be positive, got {}",
                self.building_health
            )));
        }
        if self.production_interval == 0 {
            return Err(GameError::InvalidRules(
                "production_interval must be at least one tick".to_string(),
            ));
        }
        if self.soldier.attack_damage == 0 {
            return Err(GameError::InvalidRules(
                "soldier.attack_damage must be positive".to_string(),
            ));
        }
        if self.soldier.attack_range < Fixed::ZERO || self.miner.gather_range < Fixed::ZERO {
            return Err(GameError::InvalidRules(
                "ranges cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        let rules = GameRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.production_interval, 5);
        assert_eq!(rules.soldier.attack_damage, 10);
        assert_eq!(rules.miner.capacity, 1000);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let rules = GameRules::from_ron_str(
            "(production_interval: 3, soldier: (attack_range: 2.5, attack_damage: 7))",
        )
        .unwrap();
        assert_eq!(rules.production_interval, 3);
        assert_eq!(rules.soldier.attack_range, Fixed::from_num(2.5));
        assert_eq!(rules.soldier.attack_damage, 7);
        assert_eq!(rules.unit_health, 100);
        assert_eq!(rules.miner, MinerRules::default());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = GameRules::from_ron_str("(production_interval: 0)").unwrap_err();
        assert!(matches!(err, GameError::InvalidRules(_)));
    }

    #[test]
    fn test_malformed_ron_rejected() {
        let err = GameRules::from_ron_str("(production_interval: )").unwrap_err();
        assert!(matches!(err, GameError::RulesParse(_)));
    }
}
