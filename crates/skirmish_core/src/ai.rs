//! Decision policy for computer-controlled players.
//!
//! The policy holds no memory between ticks: every decision is a function
//! of the current world plus the random source handed in for that call.
//! Each tick it
//!
//! 1. tops up every idle producing building with one default unit, and
//! 2. points every soldier at a random enemy unit and attacks.
//!
//! Target selection is two-stage: a uniformly random opponent first, then a
//! uniformly random unit of that opponent. If the chosen opponent has no
//! units the soldier holds fire this tick; there is no retry against
//! another opponent.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::entity::EntityId;
use crate::error::Result;
use crate::player::{Player, PlayerId};
use crate::production::UnitType;
use crate::world::World;

/// Summary of what the policy did in one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiReport {
    /// Production requests added.
    pub enqueued: usize,
    /// Attack commands issued (hit or not).
    pub attacks_issued: usize,
    /// Attacks that dealt damage.
    pub hits: usize,
}

/// Stateless AI policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiPolicy {
    default_unit: UnitType,
}

impl Default for AiPolicy {
    fn default() -> Self {
        Self {
            default_unit: UnitType::Soldier,
        }
    }
}

impl AiPolicy {
    /// Create a policy that keeps buildings producing `default_unit`.
    #[must_use]
    pub const fn new(default_unit: UnitType) -> Self {
        Self { default_unit }
    }

    /// Unit type queued on idle buildings.
    #[must_use]
    pub const fn default_unit(&self) -> UnitType {
        self.default_unit
    }

    /// Run one decision pass for `player`.
    pub fn update<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        player: PlayerId,
        rng: &mut R,
    ) -> Result<AiReport> {
        let mut report = AiReport {
            enqueued: self.queue_production(world, player)?,
            ..AiReport::default()
        };
        self.attack_targets(world, player, rng, &mut report)?;

        debug!(
            player = %player,
            enqueued = report.enqueued,
            attacks = report.attacks_issued,
            hits = report.hits,
            "AI update"
        );
        Ok(report)
    }

    /// Enqueue one default unit on every idle producing building.
    fn queue_production(&self, world: &mut World, player: PlayerId) -> Result<usize> {
        let buildings = owned(world, player, Player::buildings);
        let mut enqueued = 0;

        for building in buildings {
            let idle = world
                .entity(building)
                .and_then(|entity| entity.production_queue())
                .is_some_and(|queue| queue.is_empty());
            if idle {
                world.enqueue(building, self.default_unit)?;
                enqueued += 1;
            }
        }

        Ok(enqueued)
    }

    /// Pick a target for every soldier and attack it.
    fn attack_targets<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        player: PlayerId,
        rng: &mut R,
        report: &mut AiReport,
    ) -> Result<()> {
        let units = owned(world, player, Player::units);

        for unit in units {
            let can_attack = world
                .entity(unit)
                .is_some_and(|entity| entity.as_soldier().is_some());
            if !can_attack {
                continue;
            }

            let Some(target) = find_target(world, player, rng) else {
                continue;
            };

            match world.attack(unit, target) {
                Ok(outcome) => {
                    report.attacks_issued += 1;
                    if outcome.is_hit() {
                        report.hits += 1;
                    }
                }
                Err(error) => {
                    warn!(attacker = unit, target, %error, "AI attack rejected");
                }
            }
        }

        Ok(())
    }
}

/// Choose an enemy unit for `player` to attack.
///
/// Picks a random opponent, then a random unit of theirs. Returns `None`
/// when there are no opponents or the chosen one has no units.
pub fn find_target<R: Rng + ?Sized>(
    world: &World,
    player: PlayerId,
    rng: &mut R,
) -> Option<EntityId> {
    let opponents: Vec<&Player> = world.opponents(player).collect();
    let opponent = opponents.choose(rng)?;
    opponent.units().choose(rng).copied()
}

/// Copy of one of a player's membership lists, so the world can be mutated
/// while walking it.
fn owned(world: &World, player: PlayerId, list: fn(&Player) -> &[EntityId]) -> Vec<EntityId> {
    world
        .player(player)
        .map(|p| list(p).to_vec())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BuildingType;
    use crate::math::Vec2Fixed;
    use crate::player::Controller;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_enqueues_only_on_idle_buildings() {
        let mut world = World::default();
        let ai = world.add_player("AI", Controller::Ai);
        let idle = world
            .spawn_building(ai, BuildingType::Barracks, Vec2Fixed::ZERO)
            .unwrap();
        let busy = world
            .spawn_building(ai, BuildingType::Barracks, Vec2Fixed::from_ints(5, 0))
            .unwrap();
        world
            .spawn_building(ai, BuildingType::Structure, Vec2Fixed::from_ints(9, 0))
            .unwrap();
        world.enqueue(busy, UnitType::Miner).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let report = AiPolicy::default().update(&mut world, ai, &mut rng).unwrap();

        assert_eq!(report.enqueued, 1);
        let idle_queue = world.entity(idle).unwrap().production_queue().unwrap();
        assert_eq!(idle_queue.pending().collect::<Vec<_>>(), vec![UnitType::Soldier]);
        let busy_queue = world.entity(busy).unwrap().production_queue().unwrap();
        assert_eq!(busy_queue.pending().collect::<Vec<_>>(), vec![UnitType::Miner]);
    }

    #[test]
    fn test_default_unit() {
        assert_eq!(AiPolicy::default().default_unit(), UnitType::Soldier);
        assert_eq!(AiPolicy::new(UnitType::Miner).default_unit(), UnitType::Miner);
    }

    #[test]
    fn test_no_target_without_enemy_units() {
        let mut world = World::default();
        let ai = world.add_player("AI", Controller::Ai);
        world.add_player("Human", Controller::Human);
        world
            .spawn_unit(ai, UnitType::Soldier, Vec2Fixed::ZERO)
            .unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(find_target(&world, ai, &mut rng), None);

        let report = AiPolicy::default().update(&mut world, ai, &mut rng).unwrap();
        assert_eq!(report.attacks_issued, 0);
    }

    #[test]
    fn test_no_target_without_opponents() {
        let mut world = World::default();
        let ai = world.add_player("AI", Controller::Ai);
        world
            .spawn_unit(ai, UnitType::Soldier, Vec2Fixed::ZERO)
            .unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(find_target(&world, ai, &mut rng), None);
    }

    #[test]
    fn test_attacks_adjacent_enemy() {
        let mut world = World::default();
        let ai = world.add_player("AI", Controller::Ai);
        let human = world.add_player("Human", Controller::Human);
        world
            .spawn_unit(ai, UnitType::Soldier, Vec2Fixed::ZERO)
            .unwrap();
        let enemy = world
            .spawn_unit(human, UnitType::Soldier, Vec2Fixed::from_ints(0, 1))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(99);
        let report = AiPolicy::default().update(&mut world, ai, &mut rng).unwrap();

        assert_eq!(report.attacks_issued, 1);
        assert_eq!(report.hits, 1);
        assert_eq!(world.entity(enemy).unwrap().health().unwrap().current, 90);
    }

    #[test]
    fn test_miners_do_not_attack() {
        let mut world = World::default();
        let ai = world.add_player("AI", Controller::Ai);
        let human = world.add_player("Human", Controller::Human);
        world
            .spawn_unit(ai, UnitType::Miner, Vec2Fixed::ZERO)
            .unwrap();
        world
            .spawn_unit(human, UnitType::Soldier, Vec2Fixed::from_ints(0, 1))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let report = AiPolicy::default().update(&mut world, ai, &mut rng).unwrap();
        assert_eq!(report.attacks_issued, 0);
    }

    #[test]
    fn test_target_always_belongs_to_an_opponent() {
        let mut world = World::default();
        let ai = world.add_player("AI", Controller::Ai);
        let a = world.add_player("A", Controller::Human);
        let b = world.add_player("B", Controller::Human);
        world
            .spawn_unit(ai, UnitType::Soldier, Vec2Fixed::ZERO)
            .unwrap();
        let enemy_a = world
            .spawn_unit(a, UnitType::Soldier, Vec2Fixed::from_ints(20, 0))
            .unwrap();
        let enemy_b = world
            .spawn_unit(b, UnitType::Miner, Vec2Fixed::from_ints(40, 0))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..200 {
            match find_target(&world, ai, &mut rng) {
                Some(id) if id == enemy_a => seen_a = true,
                Some(id) if id == enemy_b => seen_b = true,
                other => panic!("unexpected target {other:?}"),
            }
        }
        assert!(seen_a && seen_b);
    }
}
