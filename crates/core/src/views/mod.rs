pub mod lane_overlay;
