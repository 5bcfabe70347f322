//! Frame benchmarks for td_core.
//!
//! Run with: `cargo bench -p td_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use td_core::prelude::*;

fn busy_level() -> LevelData {
    LevelData {
        id: 1,
        name: "Bench".to_string(),
        lives: 200,
        starting_gold: 10_000,
        path: vec![
            Vec2::new(-30.0, 360.0),
            Vec2::new(400.0, 360.0),
            Vec2::new(400.0, 560.0),
            Vec2::new(900.0, 560.0),
            Vec2::new(900.0, 200.0),
            Vec2::new(1310.0, 200.0),
        ],
        terrain: TerrainData::default(),
        waves: vec![WaveData {
            groups: vec![
                GroupData {
                    kind: "basic".to_string(),
                    count: 40,
                    delay: 0.05,
                },
                GroupData {
                    kind: "fast".to_string(),
                    count: 20,
                    delay: 0.05,
                },
            ],
        }],
        scaling: ScalingData::default(),
    }
}

/// A simulation mid-wave with a full tower line and the field crowded.
fn busy_simulation() -> Simulation {
    let mut sim = Simulation::new(&busy_level());

    for x in [220.0, 340.0, 540.0, 660.0, 780.0, 1020.0] {
        sim.place_tower(TowerKind::Basic, Vec2::new(x, 460.0));
        sim.place_tower(TowerKind::Splash, Vec2::new(x, 260.0));
    }
    sim.skip_countdown();

    let input = InputSnapshot {
        aim: Vec2::new(640.0, 360.0),
        firing: true,
    };
    for _ in 0..240 {
        sim.update(1.0 / 60.0, &input);
    }

    sim
}

pub fn frame_benchmark(c: &mut Criterion) {
    let input = InputSnapshot {
        aim: Vec2::new(640.0, 360.0),
        firing: true,
    };

    c.bench_function("busy_frame", |b| {
        let sim = busy_simulation();
        b.iter_batched(
            || sim.clone(),
            |mut sim| {
                black_box(sim.update(1.0 / 60.0, &input));
                sim
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("quiet_frame", |b| {
        let sim = Simulation::new(&busy_level());
        b.iter_batched(
            || sim.clone(),
            |mut sim| {
                black_box(sim.update(1.0 / 60.0, &input));
                sim
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, frame_benchmark);
criterion_main!(benches);
