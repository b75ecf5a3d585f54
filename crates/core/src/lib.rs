//! Lane-based particle simulation of blockchain transaction throughput.
//!
//! Each enabled chain owns a lane on the canvas; the [`LaneEngine`] spawns
//! pooled [`Particle`]s into every lane at that chain's configured TPS and
//! emits draw calls through a [`DrawSurface`].

pub mod config;
pub mod engine;
pub mod model;
pub mod particle;
pub mod surface;
pub mod svg;
pub mod views;

pub use config::{ConfigError, EngineConfig, SimulationConfig};
pub use engine::{LaneEngine, LaneStats, TickStats, suggested_pool_capacity};
pub use model::{ChainConfig, ChainConfigError, ChainTable, Lane, LaneLayout, Orientation};
pub use particle::Particle;
pub use surface::DrawSurface;
