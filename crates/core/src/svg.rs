//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use tps_lanes_protocol::{Paint, RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions. Commands are
/// written in order, so later ones paint over earlier ones.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 80 + 256);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    ));

    for cmd in commands {
        let element = match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
            } => {
                let stroke = border_color
                    .map(|bc| format!(r#" stroke="{}""#, theme_color(bc)))
                    .unwrap_or_default();
                format!(
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"{stroke}/>"#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    paint_color(*color),
                )
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}"/>"#,
                from.x,
                from.y,
                to.x,
                to.y,
                theme_color(*color),
            ),
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                format!(
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}" dominant-baseline="middle">{}</text>"#,
                    position.x,
                    position.y,
                    theme_color(*color),
                    escape_xml(text),
                )
            }
            RenderCommand::BeginGroup { id, .. } => {
                format!(r#"<g id="{}">"#, escape_xml(id))
            }
            RenderCommand::EndGroup => "</g>".to_string(),
        };
        svg.push_str(&element);
    }

    svg.push_str("</svg>");
    svg
}

fn paint_color(paint: Paint) -> String {
    match paint {
        Paint::Chain(hex) => hex.to_string(),
        Paint::Theme(token) => theme_color(token).to_string(),
    }
}

fn theme_color(token: ThemeToken) -> &'static str {
    match token {
        ThemeToken::Background => "#0b0b14",
        ThemeToken::LaneBorder => "#313244",
        ThemeToken::LaneHeaderText => "#cdd6f4",
        ThemeToken::TextSecondary => "#bac2de",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
