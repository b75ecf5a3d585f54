use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tps_lanes_protocol::Rect;

use super::chain::{ChainConfig, ChainTable};

/// Direction particles travel within a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Particles enter below the bottom edge and rise.
    Vertical,
    /// Particles enter left of the left edge and move right.
    Horizontal,
}

/// How enabled chains are arranged on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneLayout {
    /// Even lanes are full-height columns, odd lanes full-width rows.
    #[default]
    Alternating,
    Columns,
    Rows,
}

impl LaneLayout {
    fn orientation(self, index: usize) -> Orientation {
        match self {
            LaneLayout::Alternating if index % 2 == 0 => Orientation::Vertical,
            LaneLayout::Alternating => Orientation::Horizontal,
            LaneLayout::Columns => Orientation::Vertical,
            LaneLayout::Rows => Orientation::Horizontal,
        }
    }

    /// Compute `(bounds, orientation)` for `count` lanes on a canvas.
    ///
    /// Vertical lanes split the width into equal columns; horizontal lanes
    /// split the height into equal rows.
    pub fn arrange(self, count: usize, width: f64, height: f64) -> Vec<(Rect, Orientation)> {
        let orientations: Vec<Orientation> = (0..count).map(|i| self.orientation(i)).collect();
        let columns = orientations
            .iter()
            .filter(|o| **o == Orientation::Vertical)
            .count();
        let rows = count - columns;

        let mut column = 0usize;
        let mut row = 0usize;
        orientations
            .into_iter()
            .map(|orientation| {
                let bounds = match orientation {
                    Orientation::Vertical => {
                        let w = width / columns as f64;
                        column += 1;
                        Rect::new((column - 1) as f64 * w, 0.0, w, height)
                    }
                    Orientation::Horizontal => {
                        let h = height / rows as f64;
                        row += 1;
                        Rect::new(0.0, (row - 1) as f64 * h, width, h)
                    }
                };
                (bounds, orientation)
            })
            .collect()
    }
}

/// A region of the canvas dedicated to one chain's particle stream.
#[derive(Debug, Clone)]
pub struct Lane {
    pub chain: Arc<ChainConfig>,
    pub bounds: Rect,
    pub orientation: Orientation,
    /// Fractional spawn credit carried between ticks.
    pub accumulator: f64,
    /// Particles ever spawned into this lane.
    pub total_tx: u64,
}

/// Build one lane per enabled chain, in configuration order.
pub fn build_lanes(chains: &ChainTable, layout: LaneLayout, width: f64, height: f64) -> Vec<Lane> {
    let enabled: Vec<&Arc<ChainConfig>> = chains.enabled().collect();
    layout
        .arrange(enabled.len(), width, height)
        .into_iter()
        .zip(enabled)
        .map(|((bounds, orientation), chain)| Lane {
            chain: Arc::clone(chain),
            bounds,
            orientation,
            accumulator: 0.0,
            total_tx: 0,
        })
        .collect()
}

/// Recompute lane geometry for a new canvas size, keeping spawn state.
pub fn relayout(lanes: &mut [Lane], layout: LaneLayout, width: f64, height: f64) {
    let arranged = layout.arrange(lanes.len(), width, height);
    for (lane, (bounds, orientation)) in lanes.iter_mut().zip(arranged) {
        lane.bounds = bounds;
        lane.orientation = orientation;
    }
}
