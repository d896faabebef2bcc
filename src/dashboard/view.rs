//! Display projection of [`DashboardState`].
//!
//! Tiles, table and search panel are all derived from one snapshot, so the
//! selected tile and the filtered table always agree.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::DashboardState;
use crate::phase::PhaseGroup;
use crate::types::{Project, SearchResults};

pub const NO_RESULTS: &str = "No results found.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub tiles: Vec<StatTile>,
    pub table_title: String,
    pub rows: Vec<ProjectRow>,
    pub search: Option<SearchPanel>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTile {
    pub group: PhaseGroup,
    pub label: String,
    pub count: usize,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRow {
    pub project_id: String,
    pub title: String,
    pub link: String,
    pub phase: String,
    pub start_date: String,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLink {
    pub label: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPanel {
    pub projects: Vec<SearchLink>,
    pub tasks: Vec<SearchLink>,
    pub users: Vec<SearchLink>,
    /// Set to [`NO_RESULTS`] when all three sections are empty.
    pub empty_message: Option<String>,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        let tiles = PhaseGroup::TILES
            .iter()
            .map(|&group| StatTile {
                group,
                label: group.label().to_string(),
                count: state.stats.count_for(group),
                selected: group == state.selected_group,
            })
            .collect();

        let table_title = if state.selected_group == PhaseGroup::All {
            "Recent Projects"
        } else {
            "Filtered Projects"
        };

        Self {
            tiles,
            table_title: table_title.to_string(),
            rows: state
                .filtered_projects()
                .into_iter()
                .map(ProjectRow::from_project)
                .collect(),
            search: state.search_results.as_ref().map(SearchPanel::from_results),
            loading: state.is_loading(),
            error: state.error().map(str::to_string),
        }
    }
}

impl ProjectRow {
    pub fn from_project(project: &Project) -> Self {
        Self {
            project_id: project.project_id.clone(),
            title: project.title.clone(),
            link: project_link(&project.project_id),
            phase: project
                .phase
                .as_deref()
                .filter(|p| !p.is_empty())
                .unwrap_or("N/A")
                .to_string(),
            start_date: project
                .dates
                .start_date
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(format_start_date)
                .unwrap_or_else(|| "N/A".to_string()),
            team: project
                .team
                .as_ref()
                .map(|t| t.name.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or("Not assigned")
                .to_string(),
        }
    }
}

impl SearchPanel {
    pub fn from_results(results: &SearchResults) -> Self {
        let projects = results
            .projects
            .iter()
            .map(|p| SearchLink {
                label: p.title.clone(),
                link: project_link(&p.project_id),
            })
            .collect();

        let tasks = results
            .tasks
            .iter()
            .map(|t| {
                let project_id = t
                    .project
                    .as_ref()
                    .map(|p| p.project_id.as_str())
                    .filter(|id| !id.is_empty())
                    .unwrap_or("unknown");
                SearchLink {
                    label: t.title.clone(),
                    link: format!("/projects/{}/tasks/{}", project_id, t.task_id),
                }
            })
            .collect();

        let users = results
            .users
            .iter()
            .map(|u| SearchLink {
                label: format!("{} {} ({})", u.first_name, u.last_name, u.email),
                link: "/team".to_string(),
            })
            .collect();

        Self {
            projects,
            tasks,
            users,
            empty_message: results.is_empty().then(|| NO_RESULTS.to_string()),
        }
    }
}

fn project_link(project_id: &str) -> String {
    format!("/projects/{}", project_id)
}

/// Render a start date as `M/D/YYYY`. Unparseable input is shown verbatim.
pub fn format_start_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|dt| dt.date())
                .ok()
        });

    match date {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => raw.to_string(),
    }
}
