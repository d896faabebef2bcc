//! Phase classification: raw project lifecycle phases to dashboard groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Project;

const PLANNED_PHASES: &[&str] = &["INITIATING", "PLANNING"];
const ACTIVE_PHASES: &[&str] = &["EXECUTING"];
const COMPLETED_PHASES: &[&str] = &["MONITORING_CONTROLLING"];

/// Coarse bucket used by the dashboard tiles and project filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseGroup {
    Planned,
    Active,
    Completed,
    #[default]
    All,
}

impl PhaseGroup {
    /// Tile order on the dashboard.
    pub const TILES: [PhaseGroup; 4] = [
        PhaseGroup::All,
        PhaseGroup::Active,
        PhaseGroup::Planned,
        PhaseGroup::Completed,
    ];

    /// Raw phases belonging to this group. Empty for `All`, which is a
    /// filter over every phase rather than a set.
    pub fn phases(self) -> &'static [&'static str] {
        match self {
            PhaseGroup::Planned => PLANNED_PHASES,
            PhaseGroup::Active => ACTIVE_PHASES,
            PhaseGroup::Completed => COMPLETED_PHASES,
            PhaseGroup::All => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PhaseGroup::Planned => "Planned Projects",
            PhaseGroup::Active => "Active Projects",
            PhaseGroup::Completed => "Completed Projects",
            PhaseGroup::All => "Total Projects",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseGroup::Planned => "PLANNED",
            PhaseGroup::Active => "ACTIVE",
            PhaseGroup::Completed => "COMPLETED",
            PhaseGroup::All => "ALL",
        }
    }
}

impl fmt::Display for PhaseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PLANNED" => Ok(PhaseGroup::Planned),
            "ACTIVE" => Ok(PhaseGroup::Active),
            "COMPLETED" => Ok(PhaseGroup::Completed),
            "ALL" => Ok(PhaseGroup::All),
            other => Err(format!(
                "Unknown phase group '{}' (expected PLANNED, ACTIVE, COMPLETED or ALL)",
                other
            )),
        }
    }
}

/// Group whose phase set contains `phase`, or `None` when unclassified.
///
/// Never returns `All`.
pub fn classify(phase: &str) -> Option<PhaseGroup> {
    [PhaseGroup::Planned, PhaseGroup::Active, PhaseGroup::Completed]
        .into_iter()
        .find(|group| group.phases().contains(&phase))
}

pub fn matches_group(project: &Project, group: PhaseGroup) -> bool {
    match group {
        PhaseGroup::All => true,
        _ => group.phases().contains(&project.phase_str()),
    }
}

/// Per-group counts shown on the dashboard tiles.
///
/// Projects with an unclassified phase count toward `total_projects` only, so
/// the total can exceed the sum of the three named buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub planned_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
}

impl DashboardStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut stats = DashboardStats {
            total_projects: projects.len(),
            ..Default::default()
        };
        for project in projects {
            match classify(project.phase_str()) {
                Some(PhaseGroup::Planned) => stats.planned_projects += 1,
                Some(PhaseGroup::Active) => stats.active_projects += 1,
                Some(PhaseGroup::Completed) => stats.completed_projects += 1,
                Some(PhaseGroup::All) | None => {}
            }
        }
        stats
    }

    pub fn count_for(&self, group: PhaseGroup) -> usize {
        match group {
            PhaseGroup::Planned => self.planned_projects,
            PhaseGroup::Active => self.active_projects,
            PhaseGroup::Completed => self.completed_projects,
            PhaseGroup::All => self.total_projects,
        }
    }

    /// Projects counted in the total but in none of the named buckets.
    pub fn unclassified(&self) -> usize {
        self.total_projects
            .saturating_sub(self.planned_projects + self.active_projects + self.completed_projects)
    }
}
