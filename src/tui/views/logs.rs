// Logs view
//
// Three sections with independent lifecycles: sync logs travel inside the
// aggregate, the activity feed has its own fetch (and degrades alone when
// that fetch fails), and the client log shows this process's own captured
// tracing output.

use super::{clip_pad, render_scrolled};
use crate::grouping::log_status_class;
use crate::models::{LogEntry, SyncLog};
use crate::tui::app::{App, LogsState};
use crate::tui::theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let width = area.width as usize;
    let mut lines = Vec::new();

    section(&mut lines, "Sync Logs");
    match &app.dashboard.aggregate {
        None => lines.push(Line::from("Loading...")),
        Some(aggregate) => sync_log_lines(&mut lines, &aggregate.sync_logs, width),
    }

    section(&mut lines, "Activity Logs");
    match &app.dashboard.logs {
        LogsState::Loading => lines.push(Line::from("Loading logs...")),
        LogsState::Failed(message) => lines.push(Line::from(Span::styled(
            format!("Error fetching logs: {}", message),
            Style::default().fg(theme::status_color(crate::grouping::StatusClass::Failure)),
        ))),
        LogsState::Loaded(entries) => activity_log_lines(&mut lines, entries, width),
    }

    section(&mut lines, "Client Log");
    let captured = app.log_buffer.snapshot();
    if captured.is_empty() {
        lines.push(Line::from(Span::styled(
            "(quiet)".to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    for entry in &captured {
        lines.push(Line::from(entry.display()));
    }

    render_scrolled(f, area, lines, &mut app.dashboard.logs_scroll);
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
}

fn pill(status: &str) -> Span<'static> {
    Span::styled(
        format!("[{}]", capitalize(status)),
        Style::default().fg(theme::status_color(log_status_class(status))),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn sync_log_lines(lines: &mut Vec<Line<'static>>, logs: &[SyncLog], width: usize) {
    if logs.is_empty() {
        lines.push(Line::from("No sync logs available."));
        return;
    }
    let time_width = 20;
    let message_width = width.saturating_sub(time_width + 12).max(20);
    for log in logs {
        lines.push(Line::from(vec![
            Span::styled(
                clip_pad(&log.timestamp, time_width),
                Style::default().add_modifier(Modifier::DIM),
            ),
            Span::raw(clip_pad(&log.message, message_width)),
            pill(&log.status),
        ]));
    }
}

fn activity_log_lines(lines: &mut Vec<Line<'static>>, entries: &[LogEntry], width: usize) {
    if entries.is_empty() {
        lines.push(Line::from("No activity logged."));
        return;
    }
    let time_width = 20;
    let service_width = 12;
    let action_width = 14;
    let details_width = width
        .saturating_sub(time_width + service_width + action_width + 12)
        .max(20);
    for entry in entries {
        lines.push(Line::from(vec![
            Span::styled(
                clip_pad(&entry.timestamp, time_width),
                Style::default().add_modifier(Modifier::DIM),
            ),
            Span::raw(clip_pad(&entry.service, service_width)),
            Span::raw(clip_pad(&entry.action, action_width)),
            Span::raw(clip_pad(&entry.details, details_width)),
            pill(&entry.status),
        ]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::views::lines_to_text;

    #[test]
    fn test_empty_sync_logs_message() {
        let mut lines = Vec::new();
        sync_log_lines(&mut lines, &[], 100);
        assert_eq!(lines_to_text(&lines), vec!["No sync logs available."]);
    }

    #[test]
    fn test_sync_log_row_contains_pill() {
        let mut lines = Vec::new();
        sync_log_lines(
            &mut lines,
            &[SyncLog {
                id: "1".to_string(),
                timestamp: "2024-03-01T06:00:15Z".to_string(),
                message: "workspace pull finished".to_string(),
                status: "success".to_string(),
            }],
            100,
        );
        let text = lines_to_text(&lines).join("\n");
        assert!(text.contains("workspace pull finished"));
        assert!(text.contains("[Success]"));
    }

    #[test]
    fn test_activity_rows_render_all_columns() {
        let mut lines = Vec::new();
        activity_log_lines(
            &mut lines,
            &[LogEntry {
                timestamp: "2024-03-01T06:00:15Z".to_string(),
                service: "github".to_string(),
                action: "sync".to_string(),
                details: "42 issues".to_string(),
                status: "error".to_string(),
            }],
            120,
        );
        let text = lines_to_text(&lines).join("\n");
        assert!(text.contains("github"));
        assert!(text.contains("sync"));
        assert!(text.contains("42 issues"));
        assert!(text.contains("[Error]"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("success"), "Success");
        assert_eq!(capitalize(""), "");
    }
}
