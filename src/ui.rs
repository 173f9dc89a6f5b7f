use blip::point::{Point, PointId, PointPhase};
use blip::session::GameState;
use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::App;

const HEADER_HEIGHT: u16 = 5;

/// Split the screen into the header and the board. Shared with mouse
/// handling so hit-testing and rendering agree on where the board is.
pub fn layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(3)].as_ref())
        .split(area);
    (chunks[0], chunks[1])
}

/// The playable area inside the board's border; spawn dimensions and click
/// coordinates are relative to this rect.
pub fn board_inner(board: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(board)
}

/// Find the topmost idle point under a click at screen cell
/// `(column, row)`. Lower labels win ties, matching draw order.
pub fn hit_point<'a, I>(
    points: I,
    inner: Rect,
    column: u16,
    row: u16,
    radius: f64,
) -> Option<PointId>
where
    I: Iterator<Item = (&'a Point, PointPhase)>,
{
    if !inner.contains(Position::new(column, row)) {
        return None;
    }
    let x = (column - inner.x) as f64;
    let y = (row - inner.y) as f64;

    points
        .filter(|(_, phase)| *phase == PointPhase::Idle)
        .filter_map(|(p, _)| {
            let dx = (p.x - x).abs();
            let dy = (p.y - y).abs();
            // terminal cells are about twice as tall as wide
            (dx <= radius && dy <= (radius / 2.0).max(1.0)).then_some((p, dx + dy))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.label.cmp(&b.0.label)))
        .map(|(p, _)| p.id)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (header, board) = layout(area);
        render_header(self, header, buf);
        render_board(self, board, buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let title = match app.session.state() {
        GameState::Idle | GameState::Running => Span::styled("LET'S PLAY", bold),
        GameState::Cleared => Span::styled("ALL CLEARED", bold.fg(Color::Green)),
        GameState::Failed => Span::styled("GAME OVER", bold.fg(Color::Red)),
    };

    let mut status = vec![
        Span::styled(format!("points {:<3}", app.number_of_points), dim),
        Span::raw("  "),
        Span::styled(format!("time {:5.1}s", app.elapsed_secs), dim),
    ];
    if app.session.state() == GameState::Running {
        status.push(Span::raw("  "));
        status.push(Span::styled(
            format!("next {}", app.session.expected_label()),
            bold.fg(Color::Yellow),
        ));
        status.push(Span::raw("  "));
        status.push(Span::styled(
            if app.session.autoplay_enabled() {
                "autoplay on"
            } else {
                "autoplay off"
            },
            dim,
        ));
    }

    let hints = Line::from(Span::styled(
        "p play/restart · a autoplay · up/down points · 1-9 click · esc quit",
        dim,
    ));

    let widget = Paragraph::new(vec![
        Line::from(title),
        Line::default(),
        Line::from(status),
        Line::default(),
        hints,
    ])
    .alignment(Alignment::Left);
    widget.render(area, buf);
}

fn render_board(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let expected = app.session.expected_label();

    // higher labels first so that, on overlap, lower labels end up on top
    for (point, phase) in app
        .session
        .visible_points()
        .sorted_by_key(|(p, _)| std::cmp::Reverse(p.label))
    {
        let cx = inner.x.saturating_add(point.x.round() as u16);
        let cy = inner.y.saturating_add(point.y.round() as u16);
        if !inner.contains(Position::new(cx, cy)) {
            continue;
        }

        match phase {
            PointPhase::Idle => {
                let style = if point.label == expected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Red)
                };
                set_clipped(buf, inner, cx, cy, &point.label.to_string(), style);
            }
            PointPhase::Triggered => {
                let (fraction, remaining) = app
                    .ticks
                    .get(&point.id)
                    .copied()
                    .unwrap_or((0.0, 0.0));
                let mut style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
                if fraction > 0.5 {
                    // fading out
                    style = style.add_modifier(Modifier::DIM);
                }
                let text = format!("{} {:.1}s", point.label, remaining);
                set_clipped(buf, inner, cx, cy, &text, style);
            }
            PointPhase::Expired => {}
        }
    }
}

fn set_clipped(buf: &mut Buffer, inner: Rect, x: u16, y: u16, text: &str, style: Style) {
    let room = inner.right().saturating_sub(x) as usize;
    if room == 0 {
        return;
    }
    let clipped: String = text.chars().take(room).collect();
    buf.set_string(x, y, clipped, style);
}
