mod args;
mod renderer;

use std::fs::File;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tps_lanes_core::svg::render_svg;
use tps_lanes_core::views::lane_overlay::render_lane_overlay;
use tps_lanes_core::{LaneEngine, SimulationConfig};
use tps_lanes_protocol::{RenderCommand, Viewport};
use tracing_subscriber::EnvFilter;

use crate::args::Args;

/// Canvas used for headless SVG snapshots.
const SNAPSHOT_WIDTH: f64 = 1280.0;
const SNAPSHOT_HEIGHT: f64 = 720.0;
const SNAPSHOT_FPS: f64 = 60.0;

fn main() -> Result<()> {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n\n{}", args::USAGE);
            std::process::exit(2);
        }
    };

    if let Some(path) = &args.log {
        let file = File::create(path).with_context(|| format!("creating log file {path}"))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let mut config = match &args.config {
        Some(path) => {
            let data = std::fs::read(path).with_context(|| format!("reading config {path}"))?;
            SimulationConfig::from_json(&data).with_context(|| format!("parsing config {path}"))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.engine.seed = seed;
    } else if config.engine.seed == 0 {
        config.engine.seed = clock_seed();
    }
    let mut engine = config.build_engine()?;

    match &args.svg {
        Some(path) => write_snapshot(&mut engine, path, args.frames),
        None => renderer::run_tui(&mut engine),
    }
}

/// Simulate `frames` frames at 60 fps and write the last one as SVG.
fn write_snapshot(engine: &mut LaneEngine, path: &str, frames: u32) -> Result<()> {
    let viewport = Viewport::sized(SNAPSHOT_WIDTH, SNAPSHOT_HEIGHT);
    for _ in 0..frames {
        engine.step(1.0 / SNAPSHOT_FPS, viewport.width, viewport.height);
    }
    let mut commands: Vec<RenderCommand> = render_lane_overlay(engine.lanes(), &viewport);
    engine.draw(&mut commands);
    let svg = render_svg(&commands, viewport.width, viewport.height);
    std::fs::write(path, svg).with_context(|| format!("writing snapshot {path}"))?;
    tracing::info!(path, frames, particles = engine.active_count(), "snapshot written");
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
