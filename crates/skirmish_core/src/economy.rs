//! Resource nodes and miners.
//!
//! Miners pull resources out of finite nodes and carry them until they
//! unload into their owner's stockpile. Every transfer conserves the total:
//! whatever leaves a node lands in exactly one miner's load.
//!
//! All calculations use integer math for deterministic simulation.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::rules::MinerRules;

/// A finite resource deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Remaining resources in this node.
    remaining: u32,
}

impl ResourceNode {
    /// Create a new resource node.
    ///
    /// Empty nodes are rejected since they would be destroyed on arrival.
    pub fn new(amount: u32) -> Result<Self> {
        if amount == 0 {
            return Err(GameError::InvalidAmount {
                operation: "spawn_resource_node",
                amount,
            });
        }
        Ok(Self { remaining: amount })
    }

    /// Resources left.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Check if this node is depleted.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.remaining == 0
    }

    /// Extract resources from this node.
    ///
    /// Returns the actual amount extracted, never more than requested and
    /// never more than remained. A zero request is a caller error.
    pub fn extract(&mut self, requested: u32) -> Result<u32> {
        if requested == 0 {
            return Err(GameError::InvalidAmount {
                operation: "extract",
                amount: requested,
            });
        }
        let extracted = requested.min(self.remaining);
        self.remaining -= extracted;
        Ok(extracted)
    }
}

/// Miner capability: carries resources gathered from nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Miner {
    /// Maximum load.
    pub capacity: u32,
    /// Load currently carried.
    pub current_load: u32,
    /// Amount requested per gather.
    pub gather_rate: u32,
    /// Maximum distance to a node (inclusive).
    #[serde(with = "fixed_serde")]
    pub gather_range: Fixed,
}

impl Miner {
    /// Create an empty miner from the rule set.
    #[must_use]
    pub const fn from_rules(rules: &MinerRules) -> Self {
        Self {
            capacity: rules.capacity,
            current_load: 0,
            gather_rate: rules.gather_rate,
            gather_range: rules.gather_range,
        }
    }

    /// Free space left in the load.
    #[must_use]
    pub const fn free_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.current_load)
    }

    /// Check whether a node position is close enough to gather from.
    #[must_use]
    pub fn can_gather(&self, from: Vec2Fixed, node: Vec2Fixed) -> bool {
        from.within_range(node, self.gather_range)
    }

    /// How much the next gather should ask the node for.
    #[must_use]
    pub fn request_amount(&self) -> u32 {
        self.gather_rate.min(self.free_capacity())
    }

    /// Pull one gather's worth out of `node` into the load.
    ///
    /// Returns the transferred amount. A full miner or a miner with zero
    /// gather rate transfers nothing and leaves the node untouched.
    pub fn gather_from(&mut self, node: &mut ResourceNode) -> Result<u32> {
        let requested = self.request_amount();
        if requested == 0 {
            return Ok(0);
        }
        let gathered = node.extract(requested)?;
        self.current_load += gathered;
        Ok(gathered)
    }

    /// Empty the load, returning what was carried.
    pub fn unload(&mut self) -> u32 {
        std::mem::take(&mut self.current_load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_caps_at_remaining() {
        let mut node = ResourceNode::new(250).unwrap();
        assert_eq!(node.extract(100).unwrap(), 100);
        assert_eq!(node.extract(100).unwrap(), 100);
        assert_eq!(node.extract(100).unwrap(), 50);
        assert!(node.is_depleted());
        assert_eq!(node.extract(100).unwrap(), 0);
        assert_eq!(node.remaining(), 0);
    }

    #[test]
    fn test_extract_zero_rejected() {
        let mut node = ResourceNode::new(10).unwrap();
        assert!(matches!(
            node.extract(0),
            Err(GameError::InvalidAmount { amount: 0, .. })
        ));
        assert_eq!(node.remaining(), 10);
    }

    #[test]
    fn test_empty_node_rejected() {
        assert!(ResourceNode::new(0).is_err());
    }

    #[test]
    fn test_gather_respects_capacity() {
        let mut miner = Miner::from_rules(&MinerRules {
            capacity: 150,
            gather_rate: 100,
            gather_range: Fixed::from_num(1),
        });
        let mut node = ResourceNode::new(1000).unwrap();

        assert_eq!(miner.gather_from(&mut node).unwrap(), 100);
        assert_eq!(miner.gather_from(&mut node).unwrap(), 50);
        assert_eq!(miner.gather_from(&mut node).unwrap(), 0);
        assert_eq!(miner.current_load, 150);
        assert_eq!(node.remaining(), 850);
    }

    #[test]
    fn test_unload_empties_load() {
        let mut miner = Miner::from_rules(&MinerRules::default());
        let mut node = ResourceNode::new(500).unwrap();
        miner.gather_from(&mut node).unwrap();

        assert_eq!(miner.unload(), 100);
        assert_eq!(miner.current_load, 0);
        assert_eq!(miner.unload(), 0);
    }
}
