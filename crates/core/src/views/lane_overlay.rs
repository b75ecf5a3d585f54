use tps_lanes_protocol::{
    Paint, Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport,
};

use crate::model::{Lane, Orientation};

const LABEL_INSET: f64 = 6.0;
const NAME_FONT_SIZE: f64 = 13.0;
const STATS_FONT_SIZE: f64 = 10.0;

/// Render the static chrome under the particles: canvas background, lane
/// separators and a label per lane with its chain name, TPS and total count.
///
/// Column labels sit top-left of their column; row labels sit top-right of
/// their row so the two never stack in the shared corner.
pub fn render_lane_overlay(lanes: &[Lane], viewport: &Viewport) -> Vec<RenderCommand> {
    if !viewport.is_drawable() {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(lanes.len() * 5 + 1);
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(viewport.x, viewport.y, viewport.width, viewport.height),
        color: Paint::Theme(ThemeToken::Background),
        border_color: None,
    });

    for (index, lane) in lanes.iter().enumerate() {
        let bounds = lane.bounds;
        commands.push(RenderCommand::BeginGroup {
            id: format!("lane-{index}"),
            label: Some(lane.chain.name.clone()),
        });

        let (separator, anchor, align) = match lane.orientation {
            Orientation::Vertical => (
                (bounds.x > 0.0).then(|| {
                    (
                        Point::new(bounds.x, bounds.y),
                        Point::new(bounds.x, bounds.bottom()),
                    )
                }),
                Point::new(bounds.x + LABEL_INSET, bounds.y + LABEL_INSET),
                TextAlign::Left,
            ),
            Orientation::Horizontal => (
                (bounds.y > 0.0).then(|| {
                    (
                        Point::new(bounds.x, bounds.y),
                        Point::new(bounds.right(), bounds.y),
                    )
                }),
                Point::new(bounds.right() - LABEL_INSET, bounds.y + LABEL_INSET),
                TextAlign::Right,
            ),
        };

        if let Some((from, to)) = separator {
            commands.push(RenderCommand::DrawLine {
                from,
                to,
                color: ThemeToken::LaneBorder,
                width: 1.0,
            });
        }

        commands.push(RenderCommand::DrawText {
            position: Point::new(anchor.x, anchor.y + NAME_FONT_SIZE / 2.0),
            text: lane.chain.name.clone(),
            color: ThemeToken::LaneHeaderText,
            font_size: NAME_FONT_SIZE,
            align,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(
                anchor.x,
                anchor.y + NAME_FONT_SIZE + STATS_FONT_SIZE / 2.0 + 2.0,
            ),
            text: format!(
                "{} TPS  {} tx",
                format_count(lane.chain.tps.round() as u64),
                format_count(lane.total_tx)
            ),
            color: ThemeToken::TextSecondary,
            font_size: STATS_FONT_SIZE,
            align,
        });

        commands.push(RenderCommand::EndGroup);
    }

    commands
}

/// Format an integer with thousands separators: `12345` -> `"12,345"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChainTable, LaneLayout, build_lanes};

    fn lanes() -> Vec<Lane> {
        let mut lanes = build_lanes(&ChainTable::builtin(), LaneLayout::Alternating, 800.0, 600.0);
        lanes[3].total_tx = 1_234_567;
        lanes
    }

    #[test]
    fn one_group_per_lane() {
        let cmds = render_lane_overlay(&lanes(), &Viewport::sized(800.0, 600.0));
        let groups: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::BeginGroup { label, .. } => label.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(groups, ["Bitcoin", "Ethereum", "Base", "Solana"]);
        let ends = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::EndGroup))
            .count();
        assert_eq!(ends, 4);
        assert!(matches!(
            cmds.first(),
            Some(RenderCommand::DrawRect {
                color: Paint::Theme(ThemeToken::Background),
                ..
            })
        ));
    }

    #[test]
    fn labels_carry_tps_and_totals() {
        let cmds = render_lane_overlay(&lanes(), &Viewport::sized(800.0, 600.0));
        let texts: Vec<&str> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Solana"));
        assert!(texts.contains(&"1,000 TPS  1,234,567 tx"));
        assert!(texts.contains(&"7 TPS  0 tx"));
    }

    #[test]
    fn separators_only_between_lanes() {
        let cmds = render_lane_overlay(&lanes(), &Viewport::sized(800.0, 600.0));
        let lines: Vec<(Point, Point)> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawLine { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            lines,
            [
                (Point::new(400.0, 0.0), Point::new(400.0, 600.0)),
                (Point::new(0.0, 300.0), Point::new(800.0, 300.0)),
            ]
        );
    }

    fn group<'a>(cmds: &'a [RenderCommand], wanted: &str) -> &'a [RenderCommand] {
        let start = cmds
            .iter()
            .position(|c| matches!(c, RenderCommand::BeginGroup { id, .. } if id == wanted))
            .expect("group present");
        let len = cmds[start..]
            .iter()
            .position(|c| matches!(c, RenderCommand::EndGroup))
            .expect("group closed");
        &cmds[start + 1..start + len]
    }

    #[test]
    fn group_contents() {
        let cmds = render_lane_overlay(&lanes(), &Viewport::sized(800.0, 600.0));

        // First column: no separator, left-aligned name then stats.
        match group(&cmds, "lane-0") {
            [
                RenderCommand::DrawText {
                    text: name,
                    color: ThemeToken::LaneHeaderText,
                    align: TextAlign::Left,
                    ..
                },
                RenderCommand::DrawText {
                    text: stats,
                    color: ThemeToken::TextSecondary,
                    align: TextAlign::Left,
                    ..
                },
            ] => {
                assert_eq!(name, "Bitcoin");
                assert_eq!(stats, "7 TPS  0 tx");
            }
            other => panic!("unexpected lane-0 contents: {other:?}"),
        }

        // Second row: separator across the canvas, right-aligned labels.
        match group(&cmds, "lane-3") {
            [
                RenderCommand::DrawLine {
                    from,
                    to,
                    color: ThemeToken::LaneBorder,
                    ..
                },
                RenderCommand::DrawText {
                    position,
                    text: name,
                    align: TextAlign::Right,
                    ..
                },
                RenderCommand::DrawText {
                    text: stats,
                    align: TextAlign::Right,
                    ..
                },
            ] => {
                assert_eq!((*from, *to), (Point::new(0.0, 300.0), Point::new(800.0, 300.0)));
                assert_eq!(position.x, 800.0 - LABEL_INSET);
                assert_eq!(name, "Solana");
                assert_eq!(stats, "1,000 TPS  1,234,567 tx");
            }
            other => panic!("unexpected lane-3 contents: {other:?}"),
        }
    }

    #[test]
    fn undrawable_viewport_renders_nothing() {
        assert!(render_lane_overlay(&lanes(), &Viewport::sized(0.0, 600.0)).is_empty());
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(100_000), "100,000");
        assert_eq!(format_count(12_345_678), "12,345,678");
    }
}
