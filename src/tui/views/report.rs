// Weekly status report view
//
// A linear, print-shaped rendition of the same aggregate snapshot the board
// uses; the groupings are re-derived here, not fetched again. Four numbered
// sections: projects, customer pipeline, stakeholder pipeline, upcoming
// tasks.

use super::{clip_pad, render_scrolled};
use crate::grouping::{self, group_by, text_or_placeholder};
use crate::models::DashboardAggregate;
use crate::tui::app::App;
use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let Some(aggregate) = &app.dashboard.aggregate else {
        f.render_widget(Paragraph::new("Loading..."), area);
        return;
    };
    let generated = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let lines = report_lines(aggregate, &generated, area.width as usize);
    render_scrolled(f, area, lines, &mut app.dashboard.report_scroll);
}

fn heading(lines: &mut Vec<Line<'static>>, text: String) {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD),
    )));
}

fn field(lines: &mut Vec<Line<'static>>, label: &str, value: String) {
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {}: ", label),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::raw(value),
    ]));
}

/// Build the report as styled lines. Pure in the snapshot, timestamp, and
/// width, so the same snapshot always yields the same report.
fn report_lines(
    aggregate: &DashboardAggregate,
    generated: &str,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Weekly Status Report".to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("Generated on: {}", generated)));

    // 1. Project status, grouped by stage
    heading(&mut lines, "1. Project Status".to_string());
    for column in group_by(&aggregate.projects, grouping::UNCATEGORIZED, |p| {
        p.stage.as_deref()
    }) {
        heading(&mut lines, format!("Stage: {}", column.label));
        for project in column.items {
            lines.push(Line::from(Span::styled(
                project.project_name.clone(),
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            field(&mut lines, "Project Manager", text_or_placeholder(&project.manager));
            field(&mut lines, "Customer", text_or_placeholder(&project.customer));
            field(&mut lines, "Status", text_or_placeholder(&project.status));
            field(
                &mut lines,
                "Process Step",
                text_or_placeholder(&project.process_step),
            );
            if !project.characteristics.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  Quality Characteristics / Features".to_string(),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::DIM),
                )));
                for row in &project.characteristics {
                    lines.push(Line::from(format!(
                        "    {} - {}",
                        row.quality,
                        row.features.join(", ")
                    )));
                }
            }
            lines.push(Line::default());
        }
    }

    // 2. Customer pipeline, grouped by CRM phase
    heading(&mut lines, "2. Customer Pipeline".to_string());
    for column in group_by(&aggregate.customers, grouping::UNCATEGORIZED, |c| {
        c.crm_phase.as_deref()
    }) {
        heading(&mut lines, format!("Phase: {}", column.label));
        for customer in column.items {
            lines.push(Line::from(Span::styled(
                customer.company_name.clone(),
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            field(
                &mut lines,
                "Project Idea",
                text_or_placeholder(&customer.initial_project_idea),
            );
            field(&mut lines, "Status", text_or_placeholder(&customer.status));
            field(
                &mut lines,
                "Tasks",
                text_or_placeholder(&customer.next_step_summary),
            );
            lines.push(Line::default());
        }
    }

    // 3. Stakeholder pipeline, grouped by SRM phase
    heading(&mut lines, "3. Stakeholder Pipeline".to_string());
    for column in group_by(&aggregate.stakeholders, grouping::UNCATEGORIZED, |s| {
        s.stakeholder_phase.as_deref()
    }) {
        heading(&mut lines, format!("Phase: {}", column.label));
        for stakeholder in column.items {
            lines.push(Line::from(Span::styled(
                stakeholder.stakeholder_name.clone(),
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            field(
                &mut lines,
                "Purpose",
                text_or_placeholder(&stakeholder.purpose),
            );
            field(&mut lines, "Status", text_or_placeholder(&stakeholder.status));
            field(
                &mut lines,
                "Tasks",
                text_or_placeholder(&stakeholder.next_step_summary),
            );
            lines.push(Line::default());
        }
    }

    // 4. Upcoming tasks, flat
    heading(&mut lines, "4. Key Upcoming Tasks".to_string());
    let w = width.max(70);
    let widths = [
        w * 22 / 100,
        w * 12 / 100,
        w * 16 / 100,
        w * 14 / 100,
        w * 12 / 100,
        w * 10 / 100,
        w * 14 / 100,
    ];
    let header = [
        "Task Title",
        "Type",
        "Entity",
        "Responsible",
        "Important",
        "Priority",
        "Due Date",
    ];
    lines.push(Line::from(
        header
            .iter()
            .zip(widths)
            .map(|(h, cw)| {
                Span::styled(
                    clip_pad(h, cw),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )
            })
            .collect::<Vec<_>>(),
    ));
    for task in &aggregate.tasks {
        let cells = [
            task.title.clone(),
            text_or_placeholder(&task.task_type),
            text_or_placeholder(&task.entity_name),
            text_or_placeholder(&task.responsible_name),
            text_or_placeholder(&task.important),
            text_or_placeholder(&task.priority),
            text_or_placeholder(&task.planned_end_date),
        ];
        lines.push(Line::from(
            cells
                .iter()
                .zip(widths)
                .map(|(c, cw)| Span::raw(clip_pad(c, cw)))
                .collect::<Vec<_>>(),
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Characteristic, Project, Task};
    use crate::tui::views::lines_to_text;

    fn snapshot() -> DashboardAggregate {
        DashboardAggregate {
            projects: vec![Project {
                project_name: "Apollo".to_string(),
                stage: Some("1. Plan".to_string()),
                characteristics: vec![Characteristic {
                    quality: "Reliability".to_string(),
                    features: vec!["retries".to_string(), "healthchecks".to_string()],
                }],
                ..Default::default()
            }],
            tasks: vec![Task {
                title: "Kickoff call".to_string(),
                priority: Some("High".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_report_has_numbered_sections() {
        let text = lines_to_text(&report_lines(&snapshot(), "2024-03-01 09:00", 120)).join("\n");
        assert!(text.contains("1. Project Status"));
        assert!(text.contains("2. Customer Pipeline"));
        assert!(text.contains("3. Stakeholder Pipeline"));
        assert!(text.contains("4. Key Upcoming Tasks"));
        assert!(text.contains("Generated on: 2024-03-01 09:00"));
    }

    #[test]
    fn test_report_groups_by_stage() {
        let text = lines_to_text(&report_lines(&snapshot(), "now", 120)).join("\n");
        assert!(text.contains("Stage: 1. Plan"));
        assert!(text.contains("Apollo"));
        assert!(text.contains("Reliability - retries, healthchecks"));
    }

    #[test]
    fn test_absent_fields_use_placeholder() {
        let text = lines_to_text(&report_lines(&snapshot(), "now", 120)).join("\n");
        // Apollo has no manager or customer
        assert!(text.contains("Project Manager: N/A"));
        assert!(text.contains("Customer: N/A"));
    }
}
