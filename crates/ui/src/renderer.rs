use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};
use tps_lanes_protocol::{RenderCommand, TextAlign};

use crate::theme::{self, ThemeMode};

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area. Commands
/// are painted in order; sub-pixel and off-screen rects are skipped.
pub fn render_commands(
    painter: &egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) {
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
            } => {
                let w = rect.w as f32;
                let h = rect.h as f32;
                if w < 0.5 || h < 0.5 {
                    continue;
                }
                let egui_rect = Rect::from_min_size(
                    Pos2::new(rect.x as f32 + offset.x, rect.y as f32 + offset.y),
                    egui::vec2(w, h),
                );

                // Cull off-screen
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }

                painter.rect_filled(
                    egui_rect,
                    CornerRadius::ZERO,
                    theme::resolve_paint(*color, mode),
                );
                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        CornerRadius::ZERO,
                        Stroke::new(1.0, theme::resolve(*bc, mode)),
                        StrokeKind::Inside,
                    );
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };
                painter.text(
                    Pos2::new(position.x as f32 + offset.x, position.y as f32 + offset.y),
                    anchor,
                    text,
                    FontId::proportional(size),
                    theme::resolve(*color, mode),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                let p1 = Pos2::new(from.x as f32 + offset.x, from.y as f32 + offset.y);
                let p2 = Pos2::new(to.x as f32 + offset.x, to.y as f32 + offset.y);
                painter.line_segment(
                    [p1, p2],
                    Stroke::new(*width as f32, theme::resolve(*color, mode)),
                );
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups are semantic; nothing to paint
            }
        }
    }
}
