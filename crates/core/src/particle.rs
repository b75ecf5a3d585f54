use rand::Rng;
use tps_lanes_protocol::{HexColor, Rect};

use crate::model::{Lane, Orientation};
use crate::surface::DrawSurface;

/// Distance outside the canvas at which particles spawn and die.
pub const SPAWN_MARGIN: f64 = 10.0;
/// Half-width of the cross-axis velocity jitter.
pub const JITTER: f64 = 0.25;
/// Extra speed added on top of the chain's base speed, `[0, SPEED_VARIANCE)`.
pub const SPEED_VARIANCE: f64 = 2.0;
pub const MIN_SIZE: f64 = 1.0;
pub const SIZE_VARIANCE: f64 = 2.0;

/// One pool slot. Inactive slots are free for reuse by [`Particle::reset`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: HexColor,
    pub size: f64,
    /// Index into the engine's lanes at spawn time; never dereferenced after.
    pub lane_index: usize,
    pub active: bool,
    /// Canvas size captured at spawn.
    pub screen_width: f64,
    pub screen_height: f64,
    /// Set by the engine for particles claimed during the current tick.
    pub(crate) fresh: bool,
}

impl Particle {
    /// Reinitialize this slot in place for a new particle in `lanes[lane_index]`.
    ///
    /// An out-of-range `lane_index` leaves the slot inactive.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        lane_index: usize,
        lanes: &[Lane],
        width: f64,
        height: f64,
        rng: &mut R,
    ) {
        let Some(lane) = lanes.get(lane_index) else {
            self.active = false;
            return;
        };

        self.lane_index = lane_index;
        self.active = true;
        self.fresh = false;
        self.screen_width = width;
        self.screen_height = height;

        let speed = lane.chain.speed + rng.gen_range(0.0..SPEED_VARIANCE);
        let jitter = rng.gen_range(-JITTER..JITTER);
        match lane.orientation {
            Orientation::Vertical => {
                self.x = lane.bounds.x + unit(rng) * lane.bounds.w;
                self.y = height + SPAWN_MARGIN;
                self.vx = jitter;
                self.vy = -speed;
            }
            Orientation::Horizontal => {
                self.x = -SPAWN_MARGIN;
                self.y = lane.bounds.y + unit(rng) * lane.bounds.h;
                self.vx = speed;
                self.vy = jitter;
            }
        }

        self.color = lane.chain.color;
        self.size = MIN_SIZE + rng.gen_range(0.0..SIZE_VARIANCE);
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.fill_rect(Rect::new(self.x, self.y, self.size, self.size), self.color);
    }

    /// Whether the particle has left the canvas (plus margin) captured at
    /// spawn. Deactivates the slot when it has.
    pub fn is_dead(&mut self) -> bool {
        let gone = self.x < -SPAWN_MARGIN
            || self.y < -SPAWN_MARGIN
            || self.x > self.screen_width + SPAWN_MARGIN
            || self.y > self.screen_height + SPAWN_MARGIN;
        if gone {
            self.active = false;
        }
        gone
    }
}

/// Uniform sample in `[0, 1)`.
fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tps_lanes_protocol::RenderCommand;

    use super::*;
    use crate::model::ChainConfig;

    fn lane(orientation: Orientation, bounds: Rect) -> Lane {
        Lane {
            chain: Arc::new(ChainConfig {
                name: "Solana".to_string(),
                tps: 1000.0,
                color: HexColor::rgb(0x14, 0xF1, 0x95),
                speed: 5.0,
                glow: 2.0,
                enabled: true,
            }),
            bounds,
            orientation,
            accumulator: 0.0,
            total_tx: 0,
        }
    }

    #[test]
    fn vertical_reset_spawns_below_and_rises() {
        let lanes = vec![lane(Orientation::Vertical, Rect::new(200.0, 0.0, 100.0, 600.0))];
        let mut rng = StdRng::seed_from_u64(7);
        let mut p = Particle::default();
        for _ in 0..500 {
            p.reset(0, &lanes, 800.0, 600.0, &mut rng);
            assert!(p.active);
            assert_eq!(p.y, 610.0);
            assert!((200.0..300.0).contains(&p.x), "x = {}", p.x);
            assert!(p.vy <= -5.0 && p.vy > -7.0, "vy = {}", p.vy);
            assert!(p.vx.abs() <= JITTER);
            assert!((1.0..3.0).contains(&p.size));
            assert_eq!(p.color, HexColor::rgb(0x14, 0xF1, 0x95));
            assert_eq!((p.screen_width, p.screen_height), (800.0, 600.0));
        }
    }

    #[test]
    fn horizontal_reset_spawns_left_and_moves_right() {
        let lanes = vec![
            lane(Orientation::Vertical, Rect::new(0.0, 0.0, 800.0, 600.0)),
            lane(Orientation::Horizontal, Rect::new(0.0, 300.0, 800.0, 300.0)),
        ];
        let mut rng = StdRng::seed_from_u64(11);
        let mut p = Particle::default();
        for _ in 0..500 {
            p.reset(1, &lanes, 800.0, 600.0, &mut rng);
            assert_eq!(p.lane_index, 1);
            assert_eq!(p.x, -10.0);
            assert!((300.0..600.0).contains(&p.y), "y = {}", p.y);
            assert!(p.vx >= 5.0 && p.vx < 7.0);
            assert!(p.vy.abs() <= JITTER);
        }
    }

    #[test]
    fn reset_with_bad_index_leaves_slot_free() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut p = Particle::default();
        p.reset(3, &[], 800.0, 600.0, &mut rng);
        assert!(!p.active);
    }

    #[test]
    fn update_is_pure_translation() {
        let mut p = Particle {
            x: 100.0,
            y: 200.0,
            vx: 0.125,
            vy: -5.5,
            active: true,
            screen_width: 800.0,
            screen_height: 600.0,
            ..Particle::default()
        };
        for _ in 0..8 {
            p.update();
        }
        assert_eq!(p.x, 101.0);
        assert_eq!(p.y, 156.0);
        assert_eq!((p.vx, p.vy), (0.125, -5.5));
    }

    #[test]
    fn draw_emits_single_square() {
        let p = Particle {
            x: 3.0,
            y: 4.0,
            size: 2.5,
            color: HexColor::rgb(1, 2, 3),
            ..Particle::default()
        };
        let mut cmds: Vec<RenderCommand> = Vec::new();
        p.draw(&mut cmds);
        assert_eq!(
            cmds,
            vec![RenderCommand::DrawRect {
                rect: Rect::new(3.0, 4.0, 2.5, 2.5),
                color: HexColor::rgb(1, 2, 3).into(),
                border_color: None,
            }]
        );
    }

    #[test]
    fn death_on_top_and_left_edges() {
        let mut p = Particle {
            x: 50.0,
            y: -10.0,
            active: true,
            screen_width: 800.0,
            screen_height: 600.0,
            ..Particle::default()
        };
        assert!(!p.is_dead(), "exactly on the margin is still alive");
        assert!(p.active);

        p.y = -10.5;
        assert!(p.is_dead());
        assert!(!p.active);

        p.active = true;
        p.y = 50.0;
        p.x = -10.01;
        assert!(p.is_dead());
        assert!(!p.active);
    }

    #[test]
    fn death_on_right_and_bottom_edges() {
        let mut p = Particle {
            x: 810.0,
            y: 610.0,
            active: true,
            screen_width: 800.0,
            screen_height: 600.0,
            ..Particle::default()
        };
        assert!(!p.is_dead());

        p.x = 810.5;
        assert!(p.is_dead());

        p.active = true;
        p.x = 400.0;
        p.y = 611.0;
        assert!(p.is_dead());
    }

    #[test]
    fn dead_stays_dead_until_reset() {
        let lanes = vec![lane(Orientation::Vertical, Rect::new(0.0, 0.0, 800.0, 600.0))];
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = Particle::default();
        p.reset(0, &lanes, 800.0, 600.0, &mut rng);
        while !p.is_dead() {
            p.update();
        }
        assert!(!p.active);
        p.update();
        assert!(!p.active);
        p.reset(0, &lanes, 800.0, 600.0, &mut rng);
        assert!(p.active);
    }
}
