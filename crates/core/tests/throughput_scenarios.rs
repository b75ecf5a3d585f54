//! Integration test: drive a `LaneEngine` through whole-frame scenarios and
//! check spawn rates, spawn positions, resize behavior and pool limits.

use tps_lanes_core::views::lane_overlay::render_lane_overlay;
use tps_lanes_core::{
    ChainConfig, ChainTable, EngineConfig, LaneEngine, LaneLayout, Orientation, SimulationConfig,
};
use tps_lanes_protocol::{HexColor, Paint, RenderCommand, Viewport};

fn chain(name: &str, tps: f64, enabled: bool) -> ChainConfig {
    ChainConfig {
        name: name.to_string(),
        tps,
        color: HexColor::rgb(0x14, 0xF1, 0x95),
        speed: 5.0,
        glow: 2.0,
        enabled,
    }
}

fn engine_with(chains: Vec<ChainConfig>, pool_capacity: usize, layout: LaneLayout) -> LaneEngine {
    LaneEngine::new(
        ChainTable::new(chains).expect("valid chains"),
        &EngineConfig {
            pool_capacity,
            layout,
            seed: 0x5eed,
        },
    )
}

#[test]
fn one_second_at_1000_tps_spawns_1000_below_the_canvas() {
    let mut engine = engine_with(vec![chain("Solana", 1000.0, true)], 4096, LaneLayout::Alternating);
    let mut commands: Vec<RenderCommand> = Vec::new();
    let stats = engine.tick(1.0, 800.0, 600.0, &mut commands);

    assert_eq!(stats.spawned, 1000);
    assert_eq!(stats.dropped, 0);
    assert_eq!(engine.lanes()[0].total_tx, 1000);
    assert_eq!(engine.lanes()[0].orientation, Orientation::Vertical);
    assert_eq!(commands.len(), 1000);

    for particle in engine.particles().iter().filter(|p| p.active) {
        assert_eq!(particle.y, 610.0);
        assert!(particle.vy <= -5.0, "vy = {}", particle.vy);
        assert!((0.0..800.0).contains(&particle.x));
    }
}

#[test]
fn spawn_count_is_capped_by_pool_capacity() {
    let mut engine = engine_with(vec![chain("Solana", 1000.0, true)], 300, LaneLayout::Alternating);
    let stats = engine.step(1.0, 800.0, 600.0);
    assert_eq!(stats.spawned, 300);
    assert_eq!(stats.dropped, 700);
    assert_eq!(engine.lanes()[0].total_tx, 300);
    assert_eq!(engine.active_count(), 300);
}

#[test]
fn disabled_chain_produces_no_lane_and_no_particles() {
    let mut engine = engine_with(
        vec![chain("Near", 100_000.0, false)],
        4096,
        LaneLayout::Alternating,
    );
    let mut commands: Vec<RenderCommand> = Vec::new();
    for _ in 0..60 {
        engine.tick(1.0 / 60.0, 800.0, 600.0, &mut commands);
    }
    assert!(engine.lanes().is_empty());
    assert_eq!(engine.active_count(), 0);
    assert!(commands.is_empty());
}

#[test]
fn long_run_rate_converges_to_tps() {
    let chains = vec![chain("Bitcoin", 7.0, true), chain("Base", 180.0, true)];
    let mut engine = engine_with(chains, 8192, LaneLayout::Alternating);
    // 100 simulated seconds at 60 fps.
    for _ in 0..6000 {
        engine.step(1.0 / 60.0, 1280.0, 720.0);
    }
    let bitcoin = engine.lanes()[0].total_tx;
    let base = engine.lanes()[1].total_tx;
    assert!((699..=700).contains(&bitcoin), "bitcoin spawned {bitcoin}");
    assert!((17_999..=18_000).contains(&base), "base spawned {base}");
}

#[test]
fn resize_keeps_particles_in_place_and_moves_new_spawns() {
    let chains = vec![chain("Column", 4.0, true), chain("Row", 4.0, true)];
    let mut engine = engine_with(chains, 256, LaneLayout::Alternating);
    for _ in 0..8 {
        engine.step(0.25, 800.0, 600.0);
    }
    let before: Vec<(f64, f64, f64)> = engine
        .particles()
        .iter()
        .filter(|p| p.active)
        .map(|p| (p.x, p.y, p.screen_width))
        .collect();
    assert!(!before.is_empty());

    engine.resize(400.0, 300.0);
    let after: Vec<(f64, f64, f64)> = engine
        .particles()
        .iter()
        .filter(|p| p.active)
        .map(|p| (p.x, p.y, p.screen_width))
        .collect();
    assert_eq!(before, after);

    let row = engine.lanes()[1].bounds;
    assert_eq!((row.w, row.h), (400.0, 300.0));

    engine.step(0.25, 400.0, 300.0);
    let fresh: Vec<_> = engine
        .particles()
        .iter()
        .filter(|p| p.active && p.screen_width == 400.0 && p.lane_index == 1)
        .collect();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].x, -10.0);
    assert!(fresh[0].y >= row.y && fresh[0].y < row.y + row.h);
}

#[test]
fn full_pool_spawn_changes_nothing() {
    let mut engine = engine_with(vec![chain("A", 50.0, true)], 50, LaneLayout::Alternating);
    engine.step(1.0, 800.0, 600.0);
    assert_eq!(engine.active_count(), 50);

    let snapshot: Vec<(usize, f64, HexColor)> = engine
        .particles()
        .iter()
        .map(|p| (p.lane_index, p.size, p.color))
        .collect();
    let stats = engine.step(0.1, 800.0, 600.0);
    assert_eq!(stats.spawned, 0);
    assert_eq!(stats.dropped, 5);
    assert_eq!(engine.lanes()[0].total_tx, 50);
    let unchanged: Vec<(usize, f64, HexColor)> = engine
        .particles()
        .iter()
        .map(|p| (p.lane_index, p.size, p.color))
        .collect();
    assert_eq!(snapshot, unchanged);
}

#[test]
fn builtin_config_frame_composes_overlay_and_particles() {
    let config = SimulationConfig::default();
    let mut engine = config.build_engine().expect("builtin engine");
    let viewport = Viewport::sized(1024.0, 768.0);

    let mut frame: Vec<RenderCommand> = Vec::new();
    for _ in 0..30 {
        frame.clear();
        frame.extend(render_lane_overlay(engine.lanes(), &viewport));
        engine.tick(1.0 / 30.0, viewport.width, viewport.height, &mut frame);
    }

    let particles = frame
        .iter()
        .filter(|c| {
            matches!(
                c,
                RenderCommand::DrawRect {
                    color: Paint::Chain(_),
                    ..
                }
            )
        })
        .count();
    assert_eq!(particles, engine.active_count());
    assert!(particles > 0);

    let stats = engine.lane_stats();
    let names: Vec<_> = stats.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Bitcoin", "Ethereum", "Base", "Solana"]);
    assert!(stats[3].total_tx > stats[0].total_tx);
}
