use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
///
/// Particles are painted in their chain's own color; these tokens cover
/// everything around them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    LaneBorder,
    LaneHeaderText,

    TextSecondary,
}
