use serde::{Deserialize, Deserializer, Serialize};

/// `#[serde(default)]` only covers absent keys; the API also sends `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Projects
// =============================================================================

/// A project as returned by `GET /projects`.
///
/// Everything except the id and title is optional on the wire; the dashboard
/// renders absent values as `N/A` / `Not assigned`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "projectID")]
    pub project_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: ProjectDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<ProjectTeam>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTeam {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Project {
    /// Raw phase string, empty when the server omitted it.
    pub fn phase_str(&self) -> &str {
        self.phase.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Search
// =============================================================================

/// Result of `GET /search?searchTerm=...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<User>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.tasks.is_empty() && self.users.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "taskID")]
    pub task_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<TaskProject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProject {
    #[serde(rename = "projectID")]
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

// =============================================================================
// Units
// =============================================================================

/// Organization draft persisted by the organization setup flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgDraft {
    #[serde(
        rename = "organizationID",
        default,
        deserialize_with = "null_as_default"
    )]
    pub organization_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Request body for `POST /units`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUnit {
    pub name: String,
    pub description: String,
    #[serde(rename = "organizationID")]
    pub organization_id: String,
}
