use tps_lanes_protocol::{HexColor, Rect, RenderCommand};

/// Anything particles can be drawn onto.
pub trait DrawSurface {
    fn fill_rect(&mut self, rect: Rect, color: HexColor);
}

/// Recording surface: each fill becomes a `DrawRect` command, in call order.
impl DrawSurface for Vec<RenderCommand> {
    fn fill_rect(&mut self, rect: Rect, color: HexColor) {
        self.push(RenderCommand::DrawRect {
            rect,
            color: color.into(),
            border_color: None,
        });
    }
}
