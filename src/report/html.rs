// Static HTML assembly for the workspace report
//
// Kanban-style column tables for the three grouped sections and a flat
// table for tasks. Every value passes through escape() on the way in; the
// layout itself is a fixed template.

use super::{CustomerRow, ProjectRow, ReportData, StakeholderRow, TaskRow};
use crate::grouping::group_by;

/// Group label for rows with no phase/stage.
const NO_ENGAGEMENT: &str = "0. No engagement";

/// Escape text for safe embedding in HTML body and attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inline color for a project status value.
fn project_status_color(status: &str) -> &'static str {
    match status {
        "Potential" => "#660099",
        "Active" => "#3300FF",
        "On Hold" => "#CC9900",
        "Blocked" => "#680000",
        "Completed" => "#00FF00",
        _ => "#585858",
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// One grouped section as a fixed-layout table: group labels as the header
/// row, one cell of stacked cards per column.
fn kanban_table<T>(columns: &[crate::grouping::Column<'_, T>], card: impl Fn(&T) -> String) -> String {
    let mut html = String::from("<table class=\"kanban-table\">\n<thead><tr>");
    for column in columns {
        html.push_str(&format!("<th>{}</th>", escape(&column.label)));
    }
    html.push_str("</tr></thead>\n<tbody><tr>");
    for column in columns {
        html.push_str("<td class=\"kanban-column\">");
        for item in &column.items {
            html.push_str(&card(item));
        }
        html.push_str("</td>");
    }
    html.push_str("</tr></tbody>\n</table>\n");
    html
}

fn detail_line(label: &str, value: &str) -> String {
    format!(
        "<p class=\"card-detail\"><strong>{}:</strong> {}</p>",
        label,
        escape(value)
    )
}

fn customer_card(row: &CustomerRow) -> String {
    format!(
        "<div class=\"kanban-card\">\n<div class=\"card-title\">{}</div>\n{}\n{}\n</div>\n",
        escape(non_empty(&row.name).unwrap_or("N/A")),
        detail_line("Next Steps", non_empty(&row.next_steps).unwrap_or("N/A")),
        detail_line("Project Idea", non_empty(&row.project_idea).unwrap_or("N/A")),
    )
}

fn stakeholder_card(row: &StakeholderRow) -> String {
    format!(
        "<div class=\"kanban-card\">\n<div class=\"card-title\">{}</div>\n{}\n{}\n</div>\n",
        escape(non_empty(&row.name).unwrap_or("N/A")),
        detail_line(
            "Purpose",
            non_empty(&row.purpose).unwrap_or("No purpose defined")
        ),
        detail_line(
            "Next Steps",
            non_empty(&row.next_steps).unwrap_or("No next step set")
        ),
    )
}

fn project_card(row: &ProjectRow) -> String {
    format!(
        "<div class=\"kanban-card\">\n<div class=\"card-title\">{}</div>\n{}\n{}\n<p class=\"card-detail\"><strong>Project Status:</strong> <span style=\"color: {};\">{}</span></p>\n</div>\n",
        escape(non_empty(&row.name).unwrap_or("N/A")),
        detail_line("Customer", non_empty(&row.customer).unwrap_or("N/A")),
        detail_line("Process Step", non_empty(&row.process_step).unwrap_or("N/A")),
        project_status_color(&row.status),
        escape(non_empty(&row.status).unwrap_or("N/A")),
    )
}

fn task_row(row: &TaskRow) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(non_empty(&row.title).unwrap_or("No task title")),
        escape(non_empty(&row.entity).unwrap_or("No entity name")),
        escape(non_empty(&row.responsible).unwrap_or("No person assigned")),
        escape(non_empty(&row.planned_end).unwrap_or("No deadline set")),
        escape(non_empty(&row.status).unwrap_or("No Status")),
    )
}

/// Render the complete report document.
pub fn render(data: &ReportData, generated: &str) -> String {
    let customers = group_by(&data.customers, NO_ENGAGEMENT, |r: &CustomerRow| {
        non_empty(&r.crm_phase)
    });
    let stakeholders = group_by(&data.stakeholders, NO_ENGAGEMENT, |r: &StakeholderRow| {
        non_empty(&r.phase)
    });
    let projects = group_by(&data.projects, NO_ENGAGEMENT, |r: &ProjectRow| {
        non_empty(&r.stage)
    });

    let tasks_body: String = data.tasks.iter().map(task_row).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Project Status Report</title>
<style>
  body {{
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    margin: 0;
    padding: 20px;
    background-color: #f0f2f5;
    color: #333;
  }}
  h1, h2 {{
    color: #172b4d;
    padding-bottom: 10px;
    border-bottom: 1px solid #dfe1e6;
  }}
  h2 {{ margin-top: 40px; }}
  .kanban-table {{
    width: 100%;
    table-layout: fixed;
    border-collapse: collapse;
    margin-bottom: 20px;
  }}
  .kanban-table th {{
    background-color: #f4f5f7;
    font-weight: 600;
    color: #42526e;
    padding: 15px;
    text-align: left;
    border: 1px solid #dfe1e6;
  }}
  .kanban-column {{
    vertical-align: top;
    padding: 10px;
    border: 1px solid #dfe1e6;
  }}
  .kanban-column > .kanban-card {{ margin-bottom: 15px; }}
  .kanban-column > .kanban-card:last-child {{ margin-bottom: 0; }}
  .kanban-card {{
    background-color: #ffffff;
    border-radius: 5px;
    padding: 15px;
    box-shadow: 0 1px 3px rgba(0,0,0,0.12), 0 1px 2px rgba(0,0,0,0.24);
  }}
  .card-title {{ font-weight: 600; margin-bottom: 10px; }}
  .card-detail {{ font-size: 14px; color: #5e6c84; margin: 5px 0; }}
  .card-detail strong {{ color: #42526e; }}
  .tasks-table {{
    width: 100%;
    border-collapse: collapse;
    margin-bottom: 20px;
    background-color: #fff;
  }}
  .tasks-table th, .tasks-table td {{
    border: 1px solid #ddd;
    padding: 12px;
    text-align: left;
  }}
  .tasks-table th {{ background-color: #f2f2f2; color: #2c3e50; }}
  .tasks-table tr:nth-child(even) {{ background-color: #f9f9f9; }}
  @media print {{
    body {{ margin: 0; padding: 0; background-color: #fff; }}
    h1 {{ page-break-after: avoid; }}
    h2 {{ page-break-before: always; page-break-after: avoid; }}
    h2:first-of-type {{ page-break-before: auto; }}
    .kanban-table, .tasks-table {{ page-break-inside: auto; }}
    .kanban-card {{
      page-break-inside: avoid;
      box-shadow: none;
      border: 1px solid #ddd;
    }}
  }}
</style>
</head>
<body>
<h1>Project Status Report</h1>
<p>Generated on: {generated}</p>

<h2>Customers</h2>
{customers}
<h2>Stakeholders</h2>
{stakeholders}
<h2>Projects</h2>
{projects}
<h2>Tasks</h2>
<table class="tasks-table">
<thead>
<tr><th>Title</th><th>Entity</th><th>Responsible</th><th>Planned End</th><th>Status</th></tr>
</thead>
<tbody>
{tasks_body}</tbody>
</table>
</body>
</html>
"#,
        generated = escape(generated),
        customers = kanban_table(&customers, customer_card),
        stakeholders = kanban_table(&stakeholders, stakeholder_card),
        projects = kanban_table(&projects, project_card),
        tasks_body = tasks_body,
    )
}
