// Presentation derivation for the board and report views
//
// Pure functions of the fetched snapshot: grouping records into labeled
// columns, ordering column labels, and flattening records into display
// cards. Recomputed on every render, never mutating the source: deriving
// twice from the same snapshot must yield identical output.

use crate::models::{Customer, Project, Stakeholder};

/// Literal shown wherever a record field is absent.
pub const PLACEHOLDER: &str = "N/A";

/// Column label for records whose grouping field is absent.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Presentation class derived from a record's status string.
///
/// This is a static lookup, not computed: statuses missing from a table get
/// that table's default class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Warning,
    Danger,
    Info,
    Failure,
    Todo,
    Neutral,
}

/// Class for a project's board card, keyed by its stage label.
pub fn project_stage_class(stage: &str) -> StatusClass {
    match stage {
        "Planning & Design" => StatusClass::Warning,
        "Execution (Active)" => StatusClass::Info,
        "On Hold / Blocked" => StatusClass::Danger,
        _ => StatusClass::Neutral,
    }
}

/// Class for a task's status pill in the task table.
pub fn task_status_class(status: &str) -> StatusClass {
    match status {
        "Done" => StatusClass::Success,
        "In Progress" => StatusClass::Warning,
        _ => StatusClass::Todo,
    }
}

/// Class for a sync-log or activity-log status pill.
pub fn log_status_class(status: &str) -> StatusClass {
    match status.to_ascii_lowercase().as_str() {
        "success" => StatusClass::Success,
        "error" => StatusClass::Failure,
        _ => StatusClass::Neutral,
    }
}

/// One board column: a label and the records that share it, in original
/// relative order.
#[derive(Debug)]
pub struct Column<'a, T> {
    pub label: String,
    pub items: Vec<&'a T>,
}

/// Group records by a label field, with `fallback` standing in for records
/// whose field is absent.
///
/// Column order follows the label rule: labels with a parsable leading
/// integer sort ascending first; labels without one come after, in the
/// order they were first encountered.
pub fn group_by<'a, T, F>(items: &'a [T], fallback: &str, label_of: F) -> Vec<Column<'a, T>>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut columns: Vec<Column<'a, T>> = Vec::new();

    for item in items {
        let label = label_of(item).unwrap_or(fallback);
        match columns.iter_mut().find(|c| c.label == label) {
            Some(column) => column.items.push(item),
            None => columns.push(Column {
                label: label.to_string(),
                items: vec![item],
            }),
        }
    }

    // Stable sort keeps encounter order within equal keys, which covers
    // both duplicate numeric prefixes and the unnumbered tail.
    columns.sort_by_key(|c| match leading_number(&c.label) {
        Some(n) => (0, n),
        None => (1, 0),
    });

    columns
}

/// Parse the leading integer of a label like "1. Plan" or "10 Review".
fn leading_number(label: &str) -> Option<u64> {
    let digits: String = label
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// A record flattened for card display: title, ordered detail lines, and a
/// presentation class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub details: Vec<(&'static str, String)>,
    pub class: StatusClass,
}

/// Display text for an optional field: the value, or the placeholder.
/// An empty string counts as absent and must never render bare.
pub fn text_or_placeholder(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Board card for a project: process step and status, colored by stage.
pub fn project_card(project: &Project) -> Card {
    Card {
        title: project.project_name.clone(),
        details: vec![
            ("Process Step", text_or_placeholder(&project.description)),
            ("Project Status", text_or_placeholder(&project.status)),
        ],
        class: project
            .stage
            .as_deref()
            .map(project_stage_class)
            .unwrap_or(StatusClass::Neutral),
    }
}

/// Board card for a customer in the CRM pipeline.
pub fn customer_card(customer: &Customer) -> Card {
    Card {
        title: customer.company_name.clone(),
        details: vec![
            ("Project Idea", text_or_placeholder(&customer.initial_project_idea)),
            ("Next Step", text_or_placeholder(&customer.next_step_summary)),
        ],
        class: StatusClass::Info,
    }
}

/// Board card for a stakeholder in the SRM pipeline.
pub fn stakeholder_card(stakeholder: &Stakeholder) -> Card {
    Card {
        title: stakeholder.stakeholder_name.clone(),
        details: vec![
            ("Next", text_or_placeholder(&stakeholder.next_step_summary)),
            ("Purpose", text_or_placeholder(&stakeholder.purpose)),
        ],
        class: StatusClass::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, stage: Option<&str>) -> Project {
        Project {
            id: name.to_string(),
            project_name: name.to_string(),
            stage: stage.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_numbered_labels_sort_ascending() {
        let items = vec![
            project("b", Some("2. Build")),
            project("p1", Some("1. Plan")),
            project("p2", Some("1. Plan")),
        ];
        let columns = group_by(&items, UNCATEGORIZED, |p| p.stage.as_deref());
        let labels: Vec<_> = columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["1. Plan", "2. Build"]);

        // Both "1. Plan" records, in original relative order
        let plan = &columns[0];
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.items[0].project_name, "p1");
        assert_eq!(plan.items[1].project_name, "p2");
    }

    #[test]
    fn test_unnumbered_labels_follow_in_encounter_order() {
        let items = vec![
            project("a", Some("Backlog")),
            project("b", Some("2. Build")),
            project("c", Some("Icebox")),
            project("d", Some("1. Plan")),
        ];
        let columns = group_by(&items, UNCATEGORIZED, |p| p.stage.as_deref());
        let labels: Vec<_> = columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["1. Plan", "2. Build", "Backlog", "Icebox"]);
    }

    #[test]
    fn test_multi_digit_prefix_sorts_numerically() {
        let items = vec![
            project("j", Some("10. Done")),
            project("k", Some("2. Build")),
        ];
        let columns = group_by(&items, UNCATEGORIZED, |p| p.stage.as_deref());
        let labels: Vec<_> = columns.iter().map(|c| c.label.as_str()).collect();
        // Numeric, not lexicographic: 2 before 10
        assert_eq!(labels, vec!["2. Build", "10. Done"]);
    }

    #[test]
    fn test_missing_label_falls_back() {
        let items = vec![project("a", None), project("b", Some("1. Plan"))];
        let columns = group_by(&items, UNCATEGORIZED, |p| p.stage.as_deref());
        let labels: Vec<_> = columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["1. Plan", UNCATEGORIZED]);
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let items = vec![
            project("b", Some("2. Build")),
            project("a", Some("1. Plan")),
            project("c", None),
        ];
        let first: Vec<(String, Vec<String>)> = group_by(&items, UNCATEGORIZED, |p| {
            p.stage.as_deref()
        })
        .into_iter()
        .map(|c| (c.label, c.items.iter().map(|p| p.id.clone()).collect()))
        .collect();
        let second: Vec<(String, Vec<String>)> = group_by(&items, UNCATEGORIZED, |p| {
            p.stage.as_deref()
        })
        .into_iter()
        .map(|c| (c.label, c.items.iter().map(|p| p.id.clone()).collect()))
        .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_detail_renders_placeholder() {
        let card = project_card(&project("Apollo", Some("1. Plan")));
        assert_eq!(card.details[0], ("Process Step", PLACEHOLDER.to_string()));
        assert_eq!(card.details[1], ("Project Status", PLACEHOLDER.to_string()));

        // Empty string is treated the same as absent, never rendered bare
        let mut p = project("Apollo", None);
        p.status = Some(String::new());
        let card = project_card(&p);
        assert_eq!(card.details[1].1, PLACEHOLDER);
    }

    #[test]
    fn test_status_lookups_fall_back_to_default() {
        assert_eq!(project_stage_class("Planning & Design"), StatusClass::Warning);
        assert_eq!(project_stage_class("Execution (Active)"), StatusClass::Info);
        assert_eq!(project_stage_class("On Hold / Blocked"), StatusClass::Danger);
        assert_eq!(project_stage_class("Something Else"), StatusClass::Neutral);

        assert_eq!(task_status_class("Done"), StatusClass::Success);
        assert_eq!(task_status_class("In Progress"), StatusClass::Warning);
        assert_eq!(task_status_class("Not Started"), StatusClass::Todo);

        assert_eq!(log_status_class("Success"), StatusClass::Success);
        assert_eq!(log_status_class("error"), StatusClass::Failure);
        assert_eq!(log_status_class("skipped"), StatusClass::Neutral);
    }

    #[test]
    fn test_leading_number_parsing() {
        assert_eq!(leading_number("1. Plan"), Some(1));
        assert_eq!(leading_number("10 Review"), Some(10));
        assert_eq!(leading_number(" 3. Hold"), Some(3));
        assert_eq!(leading_number("Backlog"), None);
        assert_eq!(leading_number(""), None);
    }
}
