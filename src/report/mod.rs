// One-shot workspace report job
//
// Pulls customers, stakeholders, projects, and tasks from the workspace
// database service, resolves the two relation lookups (responsible-person
// names, linked next-step text), and writes a single static HTML file.
// A source that fails to fetch degrades to an empty section; only setup
// errors (missing env, unwritable output) abort the run.

pub mod html;
pub mod workspace;

use crate::config::Config;
use anyhow::{Context, Result};
use chrono::Local;
use std::collections::HashMap;
use std::path::PathBuf;
use workspace::{property_text, relation_ids, Page, WorkspaceClient};

/// Service credentials and database identifiers, all from the environment.
#[derive(Debug, Clone)]
pub struct ReportSources {
    pub token: String,
    pub crm_db: String,
    pub stakeholder_db: String,
    pub projects_db: String,
    pub tasks_db: String,
    pub next_steps_db: String,
    pub people_db: String,
}

impl ReportSources {
    pub fn from_env() -> Result<Self> {
        fn required(key: &str) -> Result<String> {
            std::env::var(key).with_context(|| format!("{} is not set", key))
        }
        Ok(Self {
            token: required("FLUXBOARD_WORKSPACE_TOKEN")?,
            crm_db: required("FLUXBOARD_CRM_DB")?,
            stakeholder_db: required("FLUXBOARD_STAKEHOLDER_DB")?,
            projects_db: required("FLUXBOARD_PROJECTS_DB")?,
            tasks_db: required("FLUXBOARD_TASKS_DB")?,
            next_steps_db: required("FLUXBOARD_NEXT_STEPS_DB")?,
            people_db: required("FLUXBOARD_PEOPLE_DB")?,
        })
    }
}

/// Joined rows, one struct per section of the report.
#[derive(Debug, Clone)]
pub struct CustomerRow {
    pub name: String,
    pub crm_phase: String,
    pub next_steps: String,
    pub project_idea: String,
}

#[derive(Debug, Clone)]
pub struct StakeholderRow {
    pub name: String,
    pub phase: String,
    pub purpose: String,
    pub next_steps: String,
}

#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub name: String,
    pub customer: String,
    pub stage: String,
    pub status: String,
    pub process_step: String,
}

#[derive(Debug, Clone)]
pub struct TaskRow {
    pub title: String,
    pub entity: String,
    pub responsible: String,
    pub planned_end: String,
    pub status: String,
}

/// Everything the HTML layer needs.
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    pub customers: Vec<CustomerRow>,
    pub stakeholders: Vec<StakeholderRow>,
    pub projects: Vec<ProjectRow>,
    pub tasks: Vec<TaskRow>,
}

/// Run the report job end to end.
pub async fn run(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let sources = ReportSources::from_env()?;
    let client = WorkspaceClient::new(config.report.workspace_url.clone(), sources.token.clone());

    let data = ReportData {
        customers: fetch_customers(&client, &sources).await,
        stakeholders: fetch_stakeholders(&client, &sources).await,
        projects: fetch_projects(&client, &sources).await,
        tasks: fetch_tasks(&client, &sources).await,
    };

    let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let rendered = html::render(&data, &generated);

    let path = output.unwrap_or_else(|| config.report.output.clone());
    std::fs::write(&path, rendered)
        .with_context(|| format!("writing report to {}", path.display()))?;
    tracing::info!("report written to {}", path.display());
    Ok(())
}

fn fallback(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Map of page id to a named property's text, used for relation joins.
fn name_index(pages: &[Page], property: &str) -> HashMap<String, String> {
    pages
        .iter()
        .map(|p| (p.id.clone(), property_text(p, property)))
        .collect()
}

async fn fetch_customers(client: &WorkspaceClient, sources: &ReportSources) -> Vec<CustomerRow> {
    match client.query_database(&sources.crm_db).await {
        Ok(pages) => pages
            .iter()
            .map(|page| CustomerRow {
                name: property_text(page, "Company Name"),
                crm_phase: property_text(page, "CRM Phase"),
                next_steps: property_text(page, "Meeting Next Steps"),
                project_idea: property_text(page, "Initial Project Idea"),
            })
            .collect(),
        Err(e) => {
            tracing::error!("customer fetch failed: {:#}", e);
            Vec::new()
        }
    }
}

async fn fetch_stakeholders(
    client: &WorkspaceClient,
    sources: &ReportSources,
) -> Vec<StakeholderRow> {
    let result = async {
        let stakeholders = client.query_database(&sources.stakeholder_db).await?;
        let next_steps = client.query_database(&sources.next_steps_db).await?;
        anyhow::Ok((stakeholders, next_steps))
    }
    .await;

    match result {
        Ok((stakeholders, next_steps)) => {
            let steps_by_id = name_index(&next_steps, "Next Steps");
            stakeholders
                .iter()
                .map(|page| {
                    let linked: Vec<String> = relation_ids(page, "Next Steps")
                        .iter()
                        .filter_map(|id| steps_by_id.get(id).cloned())
                        .filter(|s| !s.is_empty())
                        .collect();
                    StakeholderRow {
                        name: property_text(page, "Stakeholder Name"),
                        phase: property_text(page, "Stakeholder Phase"),
                        purpose: property_text(page, "Purpose"),
                        next_steps: fallback(linked.join("; "), "N/A"),
                    }
                })
                .collect()
        }
        Err(e) => {
            tracing::error!("stakeholder fetch failed: {:#}", e);
            Vec::new()
        }
    }
}

async fn fetch_projects(client: &WorkspaceClient, sources: &ReportSources) -> Vec<ProjectRow> {
    let result = async {
        let projects = client.query_database(&sources.projects_db).await?;
        let customers = client.query_database(&sources.crm_db).await?;
        anyhow::Ok((projects, customers))
    }
    .await;

    match result {
        Ok((projects, customers)) => {
            let customers_by_id = name_index(&customers, "Company Name");
            projects
                .iter()
                .map(|page| {
                    let names: Vec<String> = relation_ids(page, "Customer")
                        .iter()
                        .map(|id| {
                            customers_by_id
                                .get(id)
                                .cloned()
                                .unwrap_or_else(|| "No Company Contracted".to_string())
                        })
                        .collect();
                    ProjectRow {
                        name: property_text(page, "Project Name"),
                        customer: fallback(names.join("; "), "No Company Contracted"),
                        stage: fallback(property_text(page, "Stage"), "0. Not Started"),
                        status: fallback(property_text(page, "Project Status"), "No Status"),
                        process_step: fallback(
                            property_text(page, "Process Step"),
                            "No steps taken",
                        ),
                    }
                })
                .collect()
        }
        Err(e) => {
            tracing::error!("project fetch failed: {:#}", e);
            Vec::new()
        }
    }
}

async fn fetch_tasks(client: &WorkspaceClient, sources: &ReportSources) -> Vec<TaskRow> {
    let result = async {
        let tasks = client.query_database(&sources.tasks_db).await?;
        let people = client.query_database(&sources.people_db).await?;
        let stakeholders = client.query_database(&sources.stakeholder_db).await?;
        let customers = client.query_database(&sources.crm_db).await?;
        anyhow::Ok((tasks, people, stakeholders, customers))
    }
    .await;

    match result {
        Ok((tasks, people, stakeholders, customers)) => {
            let people_by_id = name_index(&people, "First Name");
            // Tasks relate to either a stakeholder or a customer; one index
            // answers both
            let mut entities_by_id = name_index(&stakeholders, "Stakeholder Name");
            entities_by_id.extend(name_index(&customers, "Company Name"));

            tasks
                .iter()
                .map(|page| {
                    let responsible: Vec<String> = relation_ids(page, "Responsible")
                        .iter()
                        .filter_map(|id| people_by_id.get(id).cloned())
                        .filter(|s| !s.is_empty())
                        .collect();
                    let mut entity_ids = relation_ids(page, "Stakeholder");
                    if entity_ids.is_empty() {
                        entity_ids = relation_ids(page, "Customer");
                    }
                    let entities: Vec<String> = entity_ids
                        .iter()
                        .filter_map(|id| entities_by_id.get(id).cloned())
                        .filter(|s| !s.is_empty())
                        .collect();
                    TaskRow {
                        title: property_text(page, "Title"),
                        entity: fallback(entities.join("; "), "No Entity Name"),
                        responsible: fallback(responsible.join("; "), "No person assigned"),
                        planned_end: fallback(
                            property_text(page, "Planned_End"),
                            "No planned end date",
                        ),
                        status: fallback(property_text(page, "Status"), "No Status Set"),
                    }
                })
                .collect()
        }
        Err(e) => {
            tracing::error!("task fetch failed: {:#}", e);
            Vec::new()
        }
    }
}
