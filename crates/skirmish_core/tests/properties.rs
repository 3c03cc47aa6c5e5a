//! Property tests for damage and extraction.

use proptest::prelude::*;
use skirmish_core::economy::ResourceNode;
use skirmish_core::entity::BuildingType;
use skirmish_core::error::GameError;
use skirmish_core::player::Controller;
use skirmish_core::production::UnitType;
use skirmish_core::rules::GameRules;
use skirmish_core::world::World;
use skirmish_test_utils::fixtures::pos;
use skirmish_test_utils::strategies::{
    arb_building_type, arb_damage, arb_health, arb_position, arb_resource_amount,
};

proptest! {
    #[test]
    fn prop_health_decreases_by_damage_until_destroyed(
        health in arb_health(),
        damage in arb_damage(),
        position in arb_position(),
        building in prop::option::of(arb_building_type()),
    ) {
        let health_value = i32::try_from(health).unwrap();
        let rules = GameRules {
            unit_health: health_value,
            building_health: health_value,
            ..GameRules::default()
        };
        let mut world = World::new(rules).unwrap();
        let owner = world.add_player("Target", Controller::Human);
        // A soldier when no building type was drawn.
        let target = match building {
            Some(building_type) => world.spawn_building(owner, building_type, position).unwrap(),
            None => world.spawn_unit(owner, UnitType::Soldier, position).unwrap(),
        };

        let mut hits: i64 = 0;
        loop {
            let outcome = world.take_damage(target, damage).unwrap();
            hits += 1;
            let expected = i64::from(health) - hits * i64::from(damage);
            if expected > 0 {
                prop_assert!(!outcome.destroyed);
                prop_assert_eq!(i64::from(outcome.remaining), expected);
                prop_assert_eq!(
                    world.entity(target).unwrap().health().unwrap().current,
                    outcome.remaining
                );
            } else {
                prop_assert!(outcome.destroyed);
                prop_assert_eq!(outcome.remaining, 0);
                break;
            }
        }

        prop_assert!(world.entity(target).is_none());
        prop_assert!(world.player(owner).unwrap().units().is_empty());
        prop_assert!(world.player(owner).unwrap().buildings().is_empty());
        prop_assert_eq!(
            world.take_damage(target, damage),
            Err(GameError::EntityNotFound(target))
        );
        prop_assert_eq!(world.destroy(target).err(), Some(GameError::EntityNotFound(target)));
    }

    #[test]
    fn prop_extraction_never_exceeds_initial(
        initial in arb_resource_amount(),
        requests in prop::collection::vec(arb_resource_amount(), 1..20),
    ) {
        let mut node = ResourceNode::new(initial).unwrap();
        let mut total: u64 = 0;

        for request in requests {
            let before = node.remaining();
            let taken = node.extract(request).unwrap();
            prop_assert_eq!(taken, request.min(before));
            prop_assert_eq!(node.remaining(), before - taken);
            total += u64::from(taken);
        }

        prop_assert!(total <= u64::from(initial));
        prop_assert_eq!(total + u64::from(node.remaining()), u64::from(initial));
    }

    #[test]
    fn prop_zero_amounts_rejected(initial in arb_resource_amount()) {
        let mut node = ResourceNode::new(initial).unwrap();
        let rejected = matches!(node.extract(0), Err(GameError::InvalidAmount { .. }));
        prop_assert!(rejected);
        prop_assert_eq!(node.remaining(), initial);

        let mut world = World::default();
        let owner = world.add_player("Target", Controller::Human);
        let unit = world.spawn_unit(owner, UnitType::Miner, pos(0, 0)).unwrap();
        let rejected = matches!(world.take_damage(unit, 0), Err(GameError::InvalidAmount { .. }));
        prop_assert!(rejected);
    }
}
