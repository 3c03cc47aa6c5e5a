//! Proptest strategies.
//!
//! Random but reproducible inputs for property-based tests of the
//! simulation rules.

use proptest::prelude::*;
use skirmish_core::entity::BuildingType;
use skirmish_core::math::{Fixed, Vec2Fixed};
use skirmish_core::production::UnitType;

/// A coordinate in a reasonable map range.
pub fn arb_coordinate() -> impl Strategy<Value = Fixed> {
    (-1000i32..1000i32).prop_map(Fixed::from_num)
}

/// A position on the map.
pub fn arb_position() -> impl Strategy<Value = Vec2Fixed> {
    (arb_coordinate(), arb_coordinate()).prop_map(|(x, y)| Vec2Fixed::new(x, y))
}

/// Starting health for a combatant.
pub fn arb_health() -> impl Strategy<Value = u32> {
    1u32..5000
}

/// A non-zero damage amount, sometimes larger than any health.
pub fn arb_damage() -> impl Strategy<Value = u32> {
    prop_oneof![1u32..200, 5000u32..10_000]
}

/// A non-zero resource amount.
pub fn arb_resource_amount() -> impl Strategy<Value = u32> {
    1u32..10_000
}

/// A unit type to produce.
pub fn arb_unit_type() -> impl Strategy<Value = UnitType> {
    prop_oneof![Just(UnitType::Soldier), Just(UnitType::Miner)]
}

/// Any building type, producing or not.
pub fn arb_building_type() -> impl Strategy<Value = BuildingType> {
    prop_oneof![Just(BuildingType::Barracks), Just(BuildingType::Structure)]
}

/// A production order of up to `max_len` units.
pub fn arb_production_order(max_len: usize) -> impl Strategy<Value = Vec<UnitType>> {
    prop::collection::vec(arb_unit_type(), 1..=max_len)
}
