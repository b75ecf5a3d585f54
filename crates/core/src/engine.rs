use rand::SeedableRng;
use rand::rngs::StdRng;
use tps_lanes_protocol::HexColor;
use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::model::{ChainTable, Lane, LaneLayout, build_lanes, relayout};
use crate::particle::{Particle, SPAWN_MARGIN};
use crate::surface::DrawSurface;

/// Upper bound on the elapsed time credited in a single tick.
pub const MAX_ELAPSED_SECONDS: f64 = 3600.0;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub spawned: usize,
    /// Spawn credit discarded because the pool had no free slot.
    pub dropped: u64,
    pub culled: usize,
    /// Active particles after the tick.
    pub active: usize,
}

/// Per-lane counters for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneStats {
    pub name: String,
    pub tps: f64,
    pub color: HexColor,
    pub total_tx: u64,
}

/// Owns the lanes and the particle pool and advances them frame by frame.
///
/// Each [`tick`](Self::tick) runs spawn, then update and cull, then draw,
/// strictly in that order. Nothing here fails: out-of-range input turns
/// into a tick that does nothing.
pub struct LaneEngine {
    chains: ChainTable,
    layout: LaneLayout,
    lanes: Vec<Lane>,
    pool: Vec<Particle>,
    width: f64,
    height: f64,
    rng: StdRng,
    saturated: bool,
}

impl LaneEngine {
    /// Create an engine with a pre-allocated pool. Lanes get their geometry
    /// on the first [`resize`](Self::resize) or tick.
    pub fn new(chains: ChainTable, config: &EngineConfig) -> Self {
        let lanes = build_lanes(&chains, config.layout, 0.0, 0.0);
        debug!(
            lanes = lanes.len(),
            pool = config.pool_capacity,
            "lane engine created"
        );
        Self {
            chains,
            layout: config.layout,
            lanes,
            pool: vec![Particle::default(); config.pool_capacity],
            width: 0.0,
            height: 0.0,
            rng: StdRng::seed_from_u64(config.seed),
            saturated: false,
        }
    }

    pub fn chains(&self) -> &ChainTable {
        &self.chains
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn particles(&self) -> &[Particle] {
        &self.pool
    }

    pub fn capacity(&self) -> usize {
        self.pool.len()
    }

    pub fn active_count(&self) -> usize {
        self.pool.iter().filter(|p| p.active).count()
    }

    pub fn lane_stats(&self) -> Vec<LaneStats> {
        self.lanes
            .iter()
            .map(|lane| LaneStats {
                name: lane.chain.name.clone(),
                tps: lane.chain.tps,
                color: lane.chain.color,
                total_tx: lane.total_tx,
            })
            .collect()
    }

    /// Recompute lane geometry. In-flight particles are left where they are.
    pub fn resize(&mut self, width: f64, height: f64) {
        if !canvas_is_valid(width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        relayout(&mut self.lanes, self.layout, width, height);
        debug!(width, height, lanes = self.lanes.len(), "lanes re-laid out");
    }

    /// Replace the chain table and rebuild lanes from it.
    ///
    /// Particles already in flight keep their velocity and stale lane index
    /// until they leave the canvas.
    pub fn reload_chains(&mut self, chains: ChainTable) {
        self.lanes = build_lanes(&chains, self.layout, self.width, self.height);
        self.chains = chains;
        debug!(lanes = self.lanes.len(), "chain table reloaded");
    }

    /// Run one full frame: spawn, update, cull, then draw onto `surface`.
    pub fn tick<S: DrawSurface + ?Sized>(
        &mut self,
        elapsed_seconds: f64,
        width: f64,
        height: f64,
        surface: &mut S,
    ) -> TickStats {
        let stats = self.step(elapsed_seconds, width, height);
        if canvas_is_valid(width, height) {
            self.draw(surface);
        }
        stats
    }

    /// Spawn, update and cull without drawing.
    pub fn step(&mut self, elapsed_seconds: f64, width: f64, height: f64) -> TickStats {
        let mut stats = TickStats::default();
        if !canvas_is_valid(width, height) {
            stats.active = self.active_count();
            return stats;
        }
        if (width, height) != (self.width, self.height) {
            self.resize(width, height);
        }

        let elapsed = clamp_elapsed(elapsed_seconds);
        if elapsed > 0.0 {
            self.spawn_due(elapsed, &mut stats);
            for particle in self.pool.iter_mut().filter(|p| p.active) {
                if particle.fresh {
                    particle.fresh = false;
                    continue;
                }
                particle.update();
                if particle.is_dead() {
                    stats.culled += 1;
                }
            }
        }

        stats.active = self.active_count();
        self.track_saturation(&stats);
        trace!(
            spawned = stats.spawned,
            dropped = stats.dropped,
            culled = stats.culled,
            active = stats.active,
            "tick"
        );
        stats
    }

    /// Draw every active particle in pool order.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        for particle in self.pool.iter().filter(|p| p.active) {
            particle.draw(surface);
        }
    }

    fn spawn_due(&mut self, elapsed: f64, stats: &mut TickStats) {
        // Slots before the cursor were found active during this pass and
        // nothing dies while spawning, so the scan never needs to restart.
        let mut cursor = 0usize;
        for lane_index in 0..self.lanes.len() {
            let due = {
                let lane = &mut self.lanes[lane_index];
                let credit = lane.accumulator + elapsed * lane.chain.tps;
                let whole = credit.floor();
                lane.accumulator = if credit.is_finite() { credit - whole } else { 0.0 };
                whole as u64
            };

            let mut claimed = 0u64;
            while claimed < due {
                let free = self.pool[cursor..].iter().position(|p| !p.active);
                let Some(slot) = free.map(|offset| cursor + offset) else {
                    break;
                };
                cursor = slot + 1;
                let particle = &mut self.pool[slot];
                particle.reset(lane_index, &self.lanes, self.width, self.height, &mut self.rng);
                particle.fresh = true;
                self.lanes[lane_index].total_tx += 1;
                claimed += 1;
            }
            stats.spawned += claimed as usize;
            stats.dropped = stats.dropped.saturating_add(due - claimed);
        }
    }

    fn track_saturation(&mut self, stats: &TickStats) {
        if stats.dropped > 0 && !self.saturated {
            self.saturated = true;
            warn!(
                capacity = self.pool.len(),
                dropped = stats.dropped,
                "particle pool saturated; dropping spawns"
            );
        } else if self.saturated && stats.dropped == 0 && stats.active < self.pool.len() {
            self.saturated = false;
            debug!(active = stats.active, "particle pool recovered");
        }
    }
}

/// Pool size that holds every enabled chain's steady-state particle count.
///
/// A particle lives for as many frames as it takes to cross the larger canvas
/// dimension (plus both margins) at its chain's base speed.
pub fn suggested_pool_capacity(
    chains: &ChainTable,
    width: f64,
    height: f64,
    frames_per_second: f64,
) -> usize {
    if !canvas_is_valid(width, height) || !(frames_per_second.is_finite() && frames_per_second > 0.0)
    {
        return 1;
    }
    let distance = width.max(height) + 2.0 * SPAWN_MARGIN;
    let total: f64 = chains
        .enabled()
        .map(|chain| {
            let lifetime_seconds = distance / chain.speed / frames_per_second;
            chain.tps * lifetime_seconds
        })
        .sum();
    if total.is_finite() {
        (total.ceil() as usize).max(1)
    } else {
        usize::MAX
    }
}

fn canvas_is_valid(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

fn clamp_elapsed(elapsed_seconds: f64) -> f64 {
    if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
        elapsed_seconds.min(MAX_ELAPSED_SECONDS)
    } else {
        0.0
    }
}
