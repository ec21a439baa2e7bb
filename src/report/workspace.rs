// Client for the workspace database service
//
// The service exposes record databases queried one POST at a time, with
// cursor pagination and per-field "property" objects tagged by type. The
// payload is loosely shaped, so properties stay as serde_json values and
// the extraction helpers below flatten them to text the way the report
// needs them.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One record in a workspace database.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Page>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl WorkspaceClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Fetch every page of a database, following the cursor to the end.
    pub async fn query_database(&self, database_id: &str) -> Result<Vec<Page>> {
        let url = format!(
            "{}/v1/databases/{}/query",
            self.base_url.trim_end_matches('/'),
            database_id
        );

        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = serde_json::Map::new();
            if let Some(ref c) = cursor {
                body.insert("start_cursor".to_string(), Value::String(c.clone()));
            }

            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.token)
                .json(&Value::Object(body))
                .send()
                .await
                .with_context(|| format!("querying database {}", database_id))?
                .error_for_status()
                .with_context(|| format!("database {} query rejected", database_id))?;

            let parsed: QueryResponse = response
                .json()
                .await
                .with_context(|| format!("decoding database {} response", database_id))?;

            pages.extend(parsed.results);

            match (parsed.has_more, parsed.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(pages)
    }
}

/// Flatten a named property to display text based on its tagged type.
/// Missing properties flatten to the empty string.
pub fn property_text(page: &Page, name: &str) -> String {
    let Some(prop) = page.properties.get(name) else {
        return String::new();
    };

    match prop.get("type").and_then(Value::as_str) {
        Some("title") => join_text_fragments(prop.get("title")),
        Some("rich_text") => join_text_fragments(prop.get("rich_text")),
        Some("select") => prop
            .pointer("/select/name")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        Some("status") => prop
            .pointer("/status/name")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        Some("multi_select") => join_names(prop.get("multi_select")),
        Some("date") => prop
            .pointer("/date/start")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        Some("number") => prop
            .get("number")
            .and_then(Value::as_f64)
            .map(|n| {
                if n.fract() == 0.0 {
                    format!("{}", n as i64)
                } else {
                    n.to_string()
                }
            })
            .unwrap_or_default(),
        Some("checkbox") => {
            if prop.get("checkbox").and_then(Value::as_bool).unwrap_or(false) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        Some("relation") => relation_ids(page, name).join(", "),
        Some("people") => join_names(prop.get("people")),
        _ => "Unknown".to_string(),
    }
}

/// Ids referenced by a relation property, empty when absent.
pub fn relation_ids(page: &Page, name: &str) -> Vec<String> {
    page.properties
        .get(name)
        .and_then(|p| p.get("relation"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn join_text_fragments(fragments: Option<&Value>) -> String {
    fragments
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|t| t.pointer("/text/content").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

fn join_names(items: Option<&Value>) -> String {
    items
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.get("name").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}
