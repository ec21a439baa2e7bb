// View layer: dashboard chrome and per-view rendering
//
// The dashboard screen is header + optional flash line + content + status
// bar. Each view builds its content as styled text lines and renders them
// through a scrolled paragraph, so scrolling works the same everywhere.

pub mod board;
pub mod logs;
pub mod report;

use crate::grouping::StatusClass;
use crate::tui::app::{App, Screen, View};
use crate::tui::{login, theme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Top-level draw: one of {login, dashboard}, decided by the controller.
pub fn draw(f: &mut Frame, app: &mut App) {
    match app.screen {
        Screen::Login => login::render(f, f.area(), &app.login, app.flash.as_deref()),
        Screen::Dashboard => draw_dashboard(f, app),
    }
}

fn draw_dashboard(f: &mut Frame, app: &mut App) {
    let flash_height = u16::from(app.flash.is_some());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(flash_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, rows[0], app.dashboard.view);

    if let Some(flash) = &app.flash {
        f.render_widget(
            Paragraph::new(flash.clone())
                .style(Style::default().fg(theme::status_color(StatusClass::Warning))),
            rows[1],
        );
    }

    match app.dashboard.view {
        View::Board => board::render(f, rows[2], app),
        View::Report => report::render(f, rows[2], app),
        View::Logs => logs::render(f, rows[2], app),
    }

    draw_status_bar(f, rows[3]);
}

fn draw_header(f: &mut Frame, area: Rect, active: View) {
    let mut spans = vec![
        Span::styled(
            "Fluxboard Project Admin",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
    ];
    for (i, view) in [View::Board, View::Report, View::Logs].iter().enumerate() {
        let style = if *view == active {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!("[{}] {}", i + 1, view.name()), style));
        spans.push(Span::raw("  "));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn draw_status_bar(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " 1/2/3: switch view · Tab: next view · ↑↓ PgUp PgDn: scroll · o: logout · q: quit",
            Style::default().add_modifier(Modifier::DIM),
        ))),
        area,
    );
}

/// Render prebuilt lines with a clamped scroll offset, and write the clamped
/// value back so repeated scroll-down keys stop at the bottom.
pub(crate) fn render_scrolled(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>, scroll: &mut u16) {
    let visible = area.height as usize;
    let max_scroll = lines.len().saturating_sub(visible) as u16;
    *scroll = (*scroll).min(max_scroll);
    f.render_widget(
        Paragraph::new(lines).scroll((*scroll, 0)),
        area,
    );
}

/// Truncate `s` to at most `width` terminal cells and pad with spaces to
/// exactly `width`. Width-aware so CJK and emoji don't break the columns.
pub(crate) fn clip_pad(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    for _ in used..width {
        out.push(' ');
    }
    out
}

#[cfg(test)]
pub(crate) fn lines_to_text(lines: &[Line<'_>]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|s| s.content.clone())
                .collect::<String>()
        })
        .collect()
}
