// Record types for the dashboard aggregate and the activity log feed
//
// The backend returns loosely-shaped JSON; all defaulting happens here at
// the deserialization boundary. Absent fields become None (or an empty
// collection), unknown fields are ignored, and nothing downstream has to
// guard against missing keys.

use serde::Deserialize;

/// The combined snapshot fetched once per authenticated session entry.
///
/// Read-only after the fetch: every view derives its presentation from the
/// same snapshot and never mutates it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardAggregate {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub stakeholders: Vec<Stakeholder>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Optional in the payload; an absent key renders as "no sync logs".
    #[serde(default)]
    pub sync_logs: Vec<SyncLog>,
}

/// A project record, grouped by `stage` on the board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub project_name: String,
    pub stage: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub manager: Option<String>,
    pub customer: Option<String>,
    pub process_step: Option<String>,
    /// Quality-characteristics table shown in the weekly report.
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
}

/// One row of a project's quality-characteristics table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Characteristic {
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// A customer record, grouped by `crm_phase` on the board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub company_name: String,
    pub crm_phase: Option<String>,
    pub initial_project_idea: Option<String>,
    pub next_step_summary: Option<String>,
    pub status: Option<String>,
}

/// A stakeholder record, grouped by `stakeholder_phase` on the board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stakeholder {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub stakeholder_name: String,
    pub stakeholder_phase: Option<String>,
    pub purpose: Option<String>,
    pub next_step_summary: Option<String>,
    pub status: Option<String>,
}

/// A task record, shown as a flat table row (no grouping).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub entity_name: Option<String>,
    pub responsible_name: Option<String>,
    pub planned_end_date: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    pub important: Option<String>,
    pub priority: Option<String>,
}

/// A sync-log row carried inside the aggregate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncLog {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// An activity-log row from the independent `/logs` feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_defaults_missing_collections() {
        // sync_logs absent entirely; the rest present but sparse
        let json = r#"{
            "projects": [{"id": "p1", "project_name": "Apollo"}],
            "customers": [],
            "stakeholders": [],
            "tasks": []
        }"#;
        let agg: DashboardAggregate = serde_json::from_str(json).unwrap();
        assert_eq!(agg.projects.len(), 1);
        assert!(agg.sync_logs.is_empty());
        assert_eq!(agg.projects[0].project_name, "Apollo");
        assert!(agg.projects[0].stage.is_none());
        assert!(agg.projects[0].characteristics.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{"id": "t1", "title": "Ship it", "extra_field": 42}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.title, "Ship it");
        assert!(task.status.is_none());
    }

    #[test]
    fn test_task_type_rename() {
        let json = r#"{"id": "t1", "title": "Call", "type": "Meeting"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.task_type.as_deref(), Some("Meeting"));
    }

    #[test]
    fn test_log_entry_full_row() {
        let json = r#"{
            "timestamp": "2024-03-01T06:00:15Z",
            "service": "workspace",
            "action": "pull",
            "details": "synced 12 records",
            "status": "success"
        }"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.service, "workspace");
        assert_eq!(entry.status, "success");
    }
}
