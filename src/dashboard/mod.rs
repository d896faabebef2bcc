//! Dashboard view-model.
//!
//! State changes only through [`reduce`], which returns a fresh snapshot per
//! event. Loads and searches are tagged with a generation number; completions
//! carrying an older generation are dropped so a slow response can never
//! overwrite newer state.

pub mod view;

use crate::phase::{matches_group, DashboardStats, PhaseGroup};
use crate::types::{Project, SearchResults};

pub use view::DashboardView;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Search lifecycle. `Failed` is tracked separately from "no results" even
/// though `search_results` is cleared to `None` in both the failure and the
/// never-searched case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Done,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub status: LoadStatus,
    pub projects: Vec<Project>,
    pub stats: DashboardStats,
    pub selected_group: PhaseGroup,
    pub search_query: String,
    pub search_results: Option<SearchResults>,
    pub search_status: SearchStatus,
    pub load_generation: u64,
    pub search_generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    LoadStarted,
    ProjectsLoaded {
        generation: u64,
        projects: Vec<Project>,
    },
    LoadFailed {
        generation: u64,
        message: String,
    },
    GroupSelected(PhaseGroup),
    SearchQueryChanged(String),
    SearchStarted {
        term: String,
    },
    SearchCompleted {
        generation: u64,
        results: SearchResults,
    },
    SearchFailed {
        generation: u64,
        message: String,
    },
}

impl DashboardState {
    /// Projects passing the selected group filter, in server order.
    pub fn filtered_projects(&self) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| matches_group(p, self.selected_group))
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

pub fn reduce(state: &DashboardState, event: DashboardEvent) -> DashboardState {
    let mut next = state.clone();
    match event {
        DashboardEvent::LoadStarted => {
            next.load_generation += 1;
            next.status = LoadStatus::Loading;
        }
        DashboardEvent::ProjectsLoaded {
            generation,
            projects,
        } => {
            if generation != state.load_generation {
                log::debug!(
                    "Dropping stale project load (generation {} < {})",
                    generation,
                    state.load_generation
                );
                return next;
            }
            next.stats = DashboardStats::from_projects(&projects);
            next.projects = projects;
            next.status = LoadStatus::Ready;
        }
        DashboardEvent::LoadFailed {
            generation,
            message,
        } => {
            if generation != state.load_generation {
                log::debug!("Dropping stale load failure (generation {})", generation);
                return next;
            }
            // Projects and stats keep their last good values.
            next.status = LoadStatus::Failed(message);
        }
        DashboardEvent::GroupSelected(group) => {
            next.selected_group = group;
        }
        DashboardEvent::SearchQueryChanged(query) => {
            next.search_query = query;
            next.search_results = None;
            next.search_status = SearchStatus::Idle;
            // Invalidate any search still in flight for the old query.
            next.search_generation += 1;
        }
        DashboardEvent::SearchStarted { term } => {
            next.search_query = term;
            next.search_generation += 1;
            next.search_status = SearchStatus::Searching;
        }
        DashboardEvent::SearchCompleted {
            generation,
            results,
        } => {
            if generation != state.search_generation {
                log::debug!("Dropping stale search results (generation {})", generation);
                return next;
            }
            next.search_results = Some(results);
            next.search_status = SearchStatus::Done;
        }
        DashboardEvent::SearchFailed {
            generation,
            message,
        } => {
            if generation != state.search_generation {
                log::debug!("Dropping stale search failure (generation {})", generation);
                return next;
            }
            next.search_results = None;
            next.search_status = SearchStatus::Failed(message);
        }
    }
    next
}
