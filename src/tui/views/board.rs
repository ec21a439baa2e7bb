// Kanban board view
//
// Three grouped sections (projects by stage, customers by CRM phase,
// stakeholders by SRM phase) followed by the flat task table. Everything is
// derived from the aggregate snapshot on each draw; the snapshot itself is
// never touched.

use super::{clip_pad, render_scrolled};
use crate::grouping::{
    self, group_by, task_status_class, text_or_placeholder, Card, StatusClass,
};
use crate::models::{DashboardAggregate, Task};
use crate::tui::app::App;
use crate::tui::theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Gap between kanban columns, in cells.
const COLUMN_GAP: usize = 2;

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let Some(aggregate) = &app.dashboard.aggregate else {
        f.render_widget(Paragraph::new("Loading..."), area);
        return;
    };
    let lines = board_lines(aggregate, area.width as usize);
    render_scrolled(f, area, lines, &mut app.dashboard.board_scroll);
}

/// Build the whole board as styled lines. Pure in the snapshot and width.
fn board_lines(aggregate: &DashboardAggregate, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    section_heading(&mut lines, "Projects Status");
    let columns = group_by(&aggregate.projects, grouping::UNCATEGORIZED, |p| {
        p.stage.as_deref()
    });
    kanban_lines(
        &mut lines,
        width,
        &columns
            .iter()
            .map(|c| {
                (
                    c.label.clone(),
                    c.items.iter().map(|p| grouping::project_card(p)).collect(),
                )
            })
            .collect::<Vec<_>>(),
    );

    section_heading(&mut lines, "Customers (CRM Pipeline)");
    let columns = group_by(&aggregate.customers, grouping::UNCATEGORIZED, |c| {
        c.crm_phase.as_deref()
    });
    kanban_lines(
        &mut lines,
        width,
        &columns
            .iter()
            .map(|c| {
                (
                    c.label.clone(),
                    c.items.iter().map(|x| grouping::customer_card(x)).collect(),
                )
            })
            .collect::<Vec<_>>(),
    );

    section_heading(&mut lines, "Stakeholders (SRM Pipeline)");
    let columns = group_by(&aggregate.stakeholders, grouping::UNCATEGORIZED, |s| {
        s.stakeholder_phase.as_deref()
    });
    kanban_lines(
        &mut lines,
        width,
        &columns
            .iter()
            .map(|c| {
                (
                    c.label.clone(),
                    c.items
                        .iter()
                        .map(|x| grouping::stakeholder_card(x))
                        .collect(),
                )
            })
            .collect::<Vec<_>>(),
    );

    section_heading(&mut lines, "Task List");
    task_table_lines(&mut lines, &aggregate.tasks, width);

    lines
}

fn section_heading(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
}

/// Lay grouped cards out as side-by-side columns, composed row by row into
/// full-width lines.
fn kanban_lines(lines: &mut Vec<Line<'static>>, width: usize, columns: &[(String, Vec<Card>)]) {
    if columns.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (nothing to show)".to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )));
        return;
    }

    let col_width = (width / columns.len()).max(18).saturating_sub(COLUMN_GAP);

    // Each column becomes its own stack of (text, style) rows first
    let mut stacks: Vec<Vec<(String, Style)>> = Vec::with_capacity(columns.len());
    for (label, cards) in columns {
        let mut stack = vec![(
            label.clone(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )];
        for card in cards {
            stack.push((
                card.title.clone(),
                Style::default()
                    .fg(theme::status_color(card.class))
                    .add_modifier(Modifier::BOLD),
            ));
            for (key, value) in &card.details {
                stack.push((
                    format!("{}: {}", key, value),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
            stack.push((String::new(), Style::default()));
        }
        stacks.push(stack);
    }

    let tallest = stacks.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..tallest {
        let mut spans = Vec::with_capacity(stacks.len() * 2);
        for stack in &stacks {
            let (text, style) = stack
                .get(row)
                .cloned()
                .unwrap_or((String::new(), Style::default()));
            spans.push(Span::styled(clip_pad(&text, col_width), style));
            spans.push(Span::raw(" ".repeat(COLUMN_GAP)));
        }
        lines.push(Line::from(spans));
    }
}

/// The flat task table, preceded by the (decorative) filter bar.
fn task_table_lines(lines: &mut Vec<Line<'static>>, tasks: &[Task], width: usize) {
    // Filter controls are drawn but drive nothing
    lines.push(Line::from(Span::styled(
        "[ Filter by Project... ▾ ]  [ Filter by Status... ▾ ]".to_string(),
        Style::default().add_modifier(Modifier::DIM),
    )));
    lines.push(Line::default());

    let widths = task_column_widths(width);
    let header = ["Title", "Entity", "Responsible", "Planned End", "Status"];
    lines.push(Line::from(
        header
            .iter()
            .zip(widths)
            .map(|(h, w)| {
                Span::styled(
                    clip_pad(h, w),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )
            })
            .collect::<Vec<_>>(),
    ));

    for task in tasks {
        let status = text_or_placeholder(&task.status);
        let class = task
            .status
            .as_deref()
            .map(task_status_class)
            .unwrap_or(StatusClass::Todo);
        lines.push(Line::from(vec![
            Span::raw(clip_pad(&task.title, widths[0])),
            Span::raw(clip_pad(&text_or_placeholder(&task.entity_name), widths[1])),
            Span::raw(clip_pad(
                &text_or_placeholder(&task.responsible_name),
                widths[2],
            )),
            Span::raw(clip_pad(
                &text_or_placeholder(&task.planned_end_date),
                widths[3],
            )),
            Span::styled(
                clip_pad(&status, widths[4]),
                Style::default().fg(theme::status_color(class)),
            ),
        ]));
    }

    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (no tasks)".to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
}

fn task_column_widths(width: usize) -> [usize; 5] {
    let width = width.max(50);
    [
        width * 3 / 10,
        width * 2 / 10,
        width * 2 / 10,
        width * 15 / 100,
        width * 15 / 100,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use crate::tui::views::lines_to_text;

    fn snapshot() -> DashboardAggregate {
        DashboardAggregate {
            projects: vec![
                Project {
                    project_name: "Borealis".to_string(),
                    stage: Some("2. Build".to_string()),
                    ..Default::default()
                },
                Project {
                    project_name: "Apollo".to_string(),
                    stage: Some("1. Plan".to_string()),
                    status: Some("Active".to_string()),
                    ..Default::default()
                },
            ],
            tasks: vec![Task {
                title: "Send proposal".to_string(),
                status: Some("In Progress".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_board_contains_all_sections() {
        let text = lines_to_text(&board_lines(&snapshot(), 120)).join("\n");
        assert!(text.contains("Projects Status"));
        assert!(text.contains("Customers (CRM Pipeline)"));
        assert!(text.contains("Stakeholders (SRM Pipeline)"));
        assert!(text.contains("Task List"));
    }

    #[test]
    fn test_columns_ordered_by_label_rule() {
        let text = lines_to_text(&board_lines(&snapshot(), 120)).join("\n");
        let plan = text.find("1. Plan").expect("plan column");
        let build = text.find("2. Build").expect("build column");
        assert!(plan < build);
    }

    #[test]
    fn test_missing_fields_render_placeholder() {
        // Borealis has no description and no status
        let text = lines_to_text(&board_lines(&snapshot(), 120)).join("\n");
        assert!(text.contains("Process Step: N/A"));
    }

    #[test]
    fn test_filter_bar_is_present_but_decorative() {
        let text = lines_to_text(&board_lines(&snapshot(), 120)).join("\n");
        assert!(text.contains("Filter by Project"));
        assert!(text.contains("Filter by Status"));
        // All tasks are rendered regardless of the filter controls
        assert!(text.contains("Send proposal"));
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let agg = snapshot();
        let first = lines_to_text(&board_lines(&agg, 100));
        let second = lines_to_text(&board_lines(&agg, 100));
        assert_eq!(first, second);
    }
}
