use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// Fill for a draw command: either a themed UI color or a chain's own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paint {
    Theme(ThemeToken),
    Chain(HexColor),
}

impl From<ThemeToken> for Paint {
    fn from(token: ThemeToken) -> Self {
        Paint::Theme(token)
    }
}

impl From<HexColor> for Paint {
    fn from(color: HexColor) -> Self {
        Paint::Chain(color)
    }
}

/// A single, stateless render instruction.
///
/// The engine and the views emit a `Vec<RenderCommand>` each frame.
/// Renderers consume this list sequentially, in order; later commands
/// paint over earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle.
    DrawRect {
        rect: Rect,
        color: Paint,
        border_color: Option<ThemeToken>,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Begin a logical group (e.g. a lane). Renderers may use this for
    /// batching or layer separation.
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_paint_serializes_as_hex() {
        let cmd = RenderCommand::DrawRect {
            rect: Rect::new(1.0, 2.0, 3.0, 3.0),
            color: HexColor::rgb(0x62, 0x7E, 0xEA).into(),
            border_color: None,
        };
        let json = serde_json::to_string(&cmd).expect("serialize");
        assert!(json.contains("\"Chain\":\"#627EEA\""), "{json}");
        let back: RenderCommand = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cmd);
    }
}
