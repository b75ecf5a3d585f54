use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};
use tps_lanes_core::LaneEngine;
use tps_lanes_core::views::lane_overlay::{format_count, render_lane_overlay};
use tps_lanes_protocol::{Paint, RenderCommand, TextAlign, ThemeToken, Viewport};

/// Logical pixels covered by one terminal cell.
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;
const FRAME_BUDGET: Duration = Duration::from_millis(16);

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::LaneBorder => Color::DarkGray,
        ThemeToken::LaneHeaderText => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
    }
}

fn paint_to_color(paint: Paint) -> Color {
    match paint {
        Paint::Theme(token) => theme_to_color(token),
        Paint::Chain(hex) => Color::Rgb(hex.r, hex.g, hex.b),
    }
}

/// Rasterizes render commands into terminal cells.
///
/// Particles become a single glyph at the cell containing their origin;
/// lines become box-drawing runs; text is placed at its anchor cell.
struct CommandCanvas<'a> {
    commands: &'a [RenderCommand],
}

impl Widget for CommandCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cell_at = |x: f64, y: f64| -> Option<(u16, u16)> {
            let col = (x / CELL_WIDTH).floor();
            let row = (y / CELL_HEIGHT).floor();
            if col < 0.0 || row < 0.0 || col >= f64::from(area.width) || row >= f64::from(area.height)
            {
                return None;
            }
            Some((area.x + col as u16, area.y + row as u16))
        };

        for cmd in self.commands {
            match cmd {
                RenderCommand::DrawRect { rect, color, .. } => {
                    // Full-canvas fills are the background; the block below
                    // already paints it.
                    if matches!(color, Paint::Theme(_)) {
                        continue;
                    }
                    if let Some(pos) = cell_at(rect.x, rect.y)
                        && let Some(cell) = buf.cell_mut(pos)
                    {
                        let glyph = if rect.w >= 2.0 { "●" } else { "·" };
                        cell.set_symbol(glyph).set_fg(paint_to_color(*color));
                    }
                }
                RenderCommand::DrawLine {
                    from, to, color, ..
                } => {
                    let vertical = (from.x - to.x).abs() < f64::EPSILON;
                    let steps = if vertical {
                        ((to.y - from.y).abs() / CELL_HEIGHT).ceil() as usize
                    } else {
                        ((to.x - from.x).abs() / CELL_WIDTH).ceil() as usize
                    };
                    for i in 0..steps {
                        let (x, y) = if vertical {
                            (from.x, from.y.min(to.y) + i as f64 * CELL_HEIGHT)
                        } else {
                            (from.x.min(to.x) + i as f64 * CELL_WIDTH, from.y)
                        };
                        if let Some(pos) = cell_at(x, y)
                            && let Some(cell) = buf.cell_mut(pos)
                        {
                            cell.set_symbol(if vertical { "│" } else { "─" })
                                .set_fg(theme_to_color(*color));
                        }
                    }
                }
                RenderCommand::DrawText {
                    position,
                    text,
                    color,
                    align,
                    ..
                } => {
                    let len = text.chars().count() as f64 * CELL_WIDTH;
                    let x = match align {
                        TextAlign::Left => position.x,
                        TextAlign::Center => position.x - len / 2.0,
                        TextAlign::Right => position.x - len,
                    };
                    if let Some((col, row)) = cell_at(x.max(0.0), position.y) {
                        let max_width = (area.right() - col) as usize;
                        buf.set_stringn(
                            col,
                            row,
                            text,
                            max_width,
                            Style::default().fg(theme_to_color(*color)),
                        );
                    }
                }
                RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
            }
        }
    }
}

/// Run the animated terminal view until the user quits.
///
/// Raw mode and the alternate screen are undone on every exit path,
/// including a failure to set the terminal up.
pub fn run_tui(engine: &mut LaneEngine) -> Result<()> {
    enable_raw_mode()?;
    let result = enter_and_run(engine);
    let restored = restore_terminal();
    result.and(restored)
}

fn enter_and_run(engine: &mut LaneEngine) -> Result<()> {
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    event_loop(&mut terminal, engine)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, engine: &mut LaneEngine) -> Result<()> {
    let mut paused = false;
    let mut last_frame = Instant::now();
    let mut commands: Vec<RenderCommand> = Vec::new();

    loop {
        let term_size = terminal.size()?;
        let viewport = Viewport::sized(
            f64::from(term_size.width) * CELL_WIDTH,
            f64::from(term_size.height.saturating_sub(1)) * CELL_HEIGHT,
        );

        let now = Instant::now();
        let elapsed = if paused {
            0.0
        } else {
            now.duration_since(last_frame).as_secs_f64()
        };
        last_frame = now;

        let stats = engine.step(elapsed, viewport.width, viewport.height);
        commands.clear();
        if viewport.is_drawable() {
            commands.extend(render_lane_overlay(engine.lanes(), &viewport));
            engine.draw(&mut commands);
        }

        let total: u64 = engine.lanes().iter().map(|l| l.total_tx).sum();
        terminal.draw(|frame| {
            let area = frame.area();

            // Header
            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " tps-lanes | {} lanes | {}/{} particles | {} tx{} | space pause | q quit ",
                    engine.lanes().len(),
                    stats.active,
                    engine.capacity(),
                    format_count(total),
                    if paused { " | paused" } else { "" },
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            frame.render_widget(
                Block::default().style(Style::default().bg(Color::Black)),
                content_area,
            );
            frame.render_widget(
                CommandCanvas {
                    commands: &commands,
                },
                content_area,
            );
        })?;

        if event::poll(FRAME_BUDGET)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => paused = !paused,
                _ => {}
            }
        }
    }

    Ok(())
}
