pub mod chain;
pub mod lane;

pub use chain::{ChainConfig, ChainConfigError, ChainTable};
pub use lane::{Lane, LaneLayout, Orientation, build_lanes, relayout};
