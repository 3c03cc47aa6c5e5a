//! Simulation benchmarks for skirmish_core.
//!
//! Run with: `cargo bench -p skirmish_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skirmish_core::entity::BuildingType;
use skirmish_core::player::Controller;
use skirmish_core::production::UnitType;
use skirmish_core::simulation::{Simulation, SimulationConfig};
use skirmish_test_utils::fixtures::{close_quarters_skirmish, pos};

/// `players` AI players packed into one column, each with a barracks and a
/// handful of soldiers, so every tick has production and combat work.
fn crowded_world(players: u32) -> Simulation {
    let mut sim = Simulation::with_config(SimulationConfig {
        seed: 42,
        ..SimulationConfig::default()
    })
    .expect("default rules are valid");

    for i in 0..players {
        let player = sim.add_player(format!("AI {i}"), Controller::Ai);
        let y = i32::try_from(i).expect("player count fits in i32");
        let world = sim.world_mut();
        world
            .spawn_building(player, BuildingType::Barracks, pos(0, y))
            .expect("player exists");
        for _ in 0..8 {
            world
                .spawn_unit(player, UnitType::Soldier, pos(1, y))
                .expect("player exists");
        }
    }
    sim
}

/// Tick throughput as the world grows.
pub fn tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for players in [2u32, 8, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, &n| {
            b.iter_batched(
                || crowded_world(n),
                |mut sim| {
                    for _ in 0..20 {
                        black_box(sim.tick());
                    }
                    sim
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// A full two-player skirmish, including state hashing.
pub fn skirmish_benchmark(c: &mut Criterion) {
    c.bench_function("close_quarters_300_ticks", |b| {
        b.iter_batched(
            || close_quarters_skirmish(7),
            |mut sim| {
                sim.run_for(300);
                black_box(sim.state_hash())
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, tick_benchmark, skirmish_benchmark);
criterion_main!(benches);
