//! JS bridge: the page owns the canvas and the animation loop, and calls
//! [`tick`] once per `requestAnimationFrame` with the frame's elapsed time.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tps_lanes_core::views::lane_overlay::render_lane_overlay;
use tps_lanes_core::{LaneEngine, SimulationConfig, TickStats};
use tps_lanes_protocol::{RenderCommand, Viewport};
use wasm_bindgen::prelude::*;

/// Engine slots; a handle is an index. Destroyed engines leave `None`.
static ENGINES: Mutex<Vec<Option<LaneEngine>>> = Mutex::new(Vec::new());

#[derive(Serialize)]
struct Frame {
    spawned: usize,
    dropped: u64,
    culled: usize,
    active: usize,
    commands: Vec<RenderCommand>,
}

impl Frame {
    fn new(stats: TickStats, commands: Vec<RenderCommand>) -> Self {
        Self {
            spawned: stats.spawned,
            dropped: stats.dropped,
            culled: stats.culled,
            active: stats.active,
            commands,
        }
    }
}

#[derive(Serialize)]
struct LaneSummary<'a> {
    name: &'a str,
    tps: f64,
    color: String,
    total_tx: u64,
}

fn engines() -> Result<MutexGuard<'static, Vec<Option<LaneEngine>>>, JsError> {
    ENGINES
        .lock()
        .map_err(|_| JsError::new("engine registry poisoned"))
}

fn with_engine<T>(
    handle: usize,
    f: impl FnOnce(&mut LaneEngine) -> Result<T, JsError>,
) -> Result<T, JsError> {
    let mut engines = engines()?;
    let engine = engines
        .get_mut(handle)
        .and_then(Option::as_mut)
        .ok_or_else(|| JsError::new("invalid engine handle"))?;
    f(engine)
}

/// Create an engine from a JSON config (empty string = built-in chains).
/// `seed` replaces a zero seed in the config, typically `Date.now()`.
/// Returns a handle for later calls.
#[wasm_bindgen]
pub fn create_engine(config_json: &str, seed: u64) -> Result<usize, JsError> {
    let mut config = if config_json.trim().is_empty() {
        SimulationConfig::default()
    } else {
        SimulationConfig::from_json(config_json.as_bytes())
            .map_err(|e| JsError::new(&e.to_string()))?
    };
    if config.engine.seed == 0 {
        config.engine.seed = seed;
    }
    let engine = config
        .build_engine()
        .map_err(|e| JsError::new(&e.to_string()))?;

    let mut engines = engines()?;
    let handle = engines.len();
    engines.push(Some(engine));
    Ok(handle)
}

/// Advance one frame and return `{spawned, dropped, culled, active, commands}`
/// as JSON. With `with_overlay`, lane labels precede the particle rects.
#[wasm_bindgen]
pub fn tick(
    handle: usize,
    elapsed_seconds: f64,
    width: f64,
    height: f64,
    with_overlay: bool,
) -> Result<String, JsError> {
    with_engine(handle, |engine| {
        let stats = engine.step(elapsed_seconds, width, height);
        let viewport = Viewport::sized(width, height);
        let mut commands = if with_overlay {
            render_lane_overlay(engine.lanes(), &viewport)
        } else {
            Vec::with_capacity(stats.active)
        };
        if viewport.is_drawable() {
            engine.draw(&mut commands);
        }
        serde_json::to_string(&Frame::new(stats, commands))
            .map_err(|e| JsError::new(&e.to_string()))
    })
}

/// Recompute lane geometry after the host canvas changed size.
#[wasm_bindgen]
pub fn resize(handle: usize, width: f64, height: f64) -> Result<(), JsError> {
    with_engine(handle, |engine| {
        engine.resize(width, height);
        Ok(())
    })
}

/// Replace the chain table, keeping in-flight particles.
#[wasm_bindgen]
pub fn reload_chains(handle: usize, config_json: &str) -> Result<(), JsError> {
    let config = SimulationConfig::from_json(config_json.as_bytes())
        .map_err(|e| JsError::new(&e.to_string()))?;
    let chains = config
        .chain_table()
        .map_err(|e| JsError::new(&e.to_string()))?;
    with_engine(handle, |engine| {
        engine.reload_chains(chains);
        Ok(())
    })
}

/// Per-lane name, TPS, color and total spawned, as JSON.
#[wasm_bindgen]
pub fn lane_stats(handle: usize) -> Result<String, JsError> {
    with_engine(handle, |engine| {
        let stats = engine.lane_stats();
        let lanes: Vec<LaneSummary<'_>> = stats
            .iter()
            .map(|s| LaneSummary {
                name: &s.name,
                tps: s.tps,
                color: s.color.to_string(),
                total_tx: s.total_tx,
            })
            .collect();
        serde_json::to_string(&lanes).map_err(|e| JsError::new(&e.to_string()))
    })
}

/// Release an engine and its pool. Called when the host unmounts.
#[wasm_bindgen]
pub fn destroy_engine(handle: usize) -> Result<(), JsError> {
    let mut engines = engines()?;
    let slot = engines
        .get_mut(handle)
        .filter(|slot| slot.is_some())
        .ok_or_else(|| JsError::new("invalid engine handle"))?;
    *slot = None;
    Ok(())
}
