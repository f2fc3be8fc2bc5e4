//! Criterion benchmarks for the per-frame hot loops.
//!
//! Benchmarks:
//!   - build_track on the demo circuit (reruns on every live edit)
//!   - export_track back to interchange data
//!   - generate_track with a seeded rng
//!   - vehicle_step, the once-per-frame integrator
//!   - elevation_at / curve_at position queries
//!
//! Budget: vehicle_step and the position queries < 200ns; a full track
//! build < 1ms.
//!
//! Run with: cargo bench -p simulation --bench core_loops

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use simulation::builder::{build_track, export_track};
use simulation::config::ViewConfig;
use simulation::game_rng::GameRng;
use simulation::input::PlayerInput;
use simulation::procedural::generate_track;
use simulation::track_data::TrackData;
use simulation::vehicle::{vehicle_step, Player, VehicleTuning};

// ---------------------------------------------------------------------------
// Benchmark: track building
// ---------------------------------------------------------------------------

fn bench_track_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_build");
    let data = TrackData::demo_circuit();
    let player_z = ViewConfig::default().player_z();

    group.bench_function("demo_circuit", |b| {
        b.iter(|| black_box(build_track(black_box(&data), black_box(player_z))));
    });

    let track = build_track(&data, player_z);
    group.bench_function("export", |b| {
        b.iter(|| black_box(export_track(black_box(&track))));
    });

    group.finish();
}

fn bench_generate_track(c: &mut Criterion) {
    c.bench_function("generate_track", |b| {
        let mut rng = GameRng::from_seed_u64(7);
        b.iter(|| black_box(generate_track(&mut rng.0)));
    });
}

// ---------------------------------------------------------------------------
// Benchmark: per-frame integration and queries
// ---------------------------------------------------------------------------

fn bench_vehicle_step(c: &mut Criterion) {
    let view = ViewConfig::default();
    let track = build_track(&TrackData::demo_circuit(), view.player_z());
    let tuning = VehicleTuning::default();
    let input = PlayerInput {
        accelerate: true,
        right: true,
        ..PlayerInput::default()
    };
    let player_z = view.player_z();

    c.bench_function("vehicle_step", |b| {
        let mut player = Player::default();
        b.iter(|| {
            vehicle_step(&mut player, &input, &tuning, &track, player_z, 1.0 / 60.0);
            black_box(player.position)
        });
    });
}

fn bench_position_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_queries");
    group.sample_size(1000);
    let track = build_track(&TrackData::demo_circuit(), 0.0);

    group.bench_function("elevation_at", |b| {
        b.iter(|| black_box(track.elevation_at(black_box(31_415.9))));
    });

    group.bench_function("curve_at", |b| {
        b.iter(|| black_box(track.curve_at(black_box(31_415.9))));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Register groups
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_track_build,
    bench_generate_track,
    bench_vehicle_step,
    bench_position_queries
);
criterion_main!(benches);
