// Dashboard service
// Drives the dashboard reducer from API calls: initial load, retry, group
// filter and search submission.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::ProjectsApi;
use crate::dashboard::{reduce, DashboardEvent, DashboardState, DashboardView, LoadStatus};
use crate::phase::PhaseGroup;

/// Owns the current dashboard snapshot and the API it loads from.
///
/// The state lock is never held across an `.await`; every network call is
/// bracketed by a "started" event (which bumps the generation) and a
/// completion event tagged with that generation.
pub struct DashboardController {
    api: Arc<dyn ProjectsApi>,
    state: Mutex<DashboardState>,
}

impl DashboardController {
    pub fn new(api: Arc<dyn ProjectsApi>) -> Self {
        Self {
            api,
            state: Mutex::new(DashboardState::default()),
        }
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.lock().clone()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from_state(&self.state.lock())
    }

    fn dispatch(&self, event: DashboardEvent) -> DashboardState {
        let mut guard = self.state.lock();
        *guard = reduce(&guard, event);
        guard.clone()
    }

    /// First load. Only leaves `Idle` once; later calls return the current
    /// snapshot untouched. The `Idle` check and `LoadStarted` share one lock.
    pub async fn init(&self) -> DashboardState {
        let generation = {
            let mut guard = self.state.lock();
            if guard.status != LoadStatus::Idle {
                return guard.clone();
            }
            *guard = reduce(&guard, DashboardEvent::LoadStarted);
            guard.load_generation
        };
        self.finish_load(generation).await
    }

    /// Re-enter `Loading` from `Ready` or `Failed`.
    pub async fn retry(&self) -> DashboardState {
        log::info!("Dashboard: retrying project load");
        let generation = self.dispatch(DashboardEvent::LoadStarted).load_generation;
        self.finish_load(generation).await
    }

    async fn finish_load(&self, generation: u64) -> DashboardState {
        let event = match self.api.fetch_projects().await {
            Ok(projects) => DashboardEvent::ProjectsLoaded {
                generation,
                projects,
            },
            Err(e) => {
                log::error!("Error fetching dashboard data: {}", e);
                DashboardEvent::LoadFailed {
                    generation,
                    message: e.to_string(),
                }
            }
        };
        self.dispatch(event)
    }

    pub fn set_group_filter(&self, group: PhaseGroup) -> DashboardState {
        self.dispatch(DashboardEvent::GroupSelected(group))
    }

    pub fn set_search_query(&self, query: &str) -> DashboardState {
        self.dispatch(DashboardEvent::SearchQueryChanged(query.to_string()))
    }

    /// Run a search. Blank terms are ignored without touching state or the
    /// network. Failures clear the results (rendered as "no results") and are
    /// recorded as `SearchStatus::Failed`.
    pub async fn submit_search(&self, term: &str) -> DashboardState {
        if term.trim().is_empty() {
            return self.snapshot();
        }

        let generation = self
            .dispatch(DashboardEvent::SearchStarted {
                term: term.to_string(),
            })
            .search_generation;

        let event = match self.api.search(term).await {
            Ok(results) => DashboardEvent::SearchCompleted {
                generation,
                results,
            },
            Err(e) => {
                log::warn!("Search error: {}", e);
                DashboardEvent::SearchFailed {
                    generation,
                    message: e.to_string(),
                }
            }
        };
        self.dispatch(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::dashboard::SearchStatus;
    use crate::error::ApiError;
    use crate::types::{Project, ProjectDates, SearchResults};

    type Gate = Option<oneshot::Receiver<()>>;

    #[derive(Default)]
    struct FakeApi {
        projects: Mutex<VecDeque<(Gate, Result<Vec<Project>, ApiError>)>>,
        searches: Mutex<VecDeque<Result<SearchResults, ApiError>>>,
        fetch_calls: AtomicUsize,
        search_calls: AtomicUsize,
    }

    impl FakeApi {
        fn push_projects(&self, result: Result<Vec<Project>, ApiError>) {
            self.projects.lock().push_back((None, result));
        }

        fn push_gated_projects(&self, result: Result<Vec<Project>, ApiError>) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.projects.lock().push_back((Some(rx), result));
            tx
        }

        fn push_search(&self, result: Result<SearchResults, ApiError>) {
            self.searches.lock().push_back(result);
        }
    }

    #[async_trait]
    impl ProjectsApi for FakeApi {
        async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            let (gate, result) = self
                .projects
                .lock()
                .pop_front()
                .expect("unexpected fetch_projects call");
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        }

        async fn search(&self, _term: &str) -> Result<SearchResults, ApiError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.searches
                .lock()
                .pop_front()
                .expect("unexpected search call")
        }
    }

    fn project(id: &str, phase: &str) -> Project {
        Project {
            project_id: id.to_string(),
            title: id.to_string(),
            phase: Some(phase.to_string()),
            dates: ProjectDates::default(),
            team: None,
        }
    }

    fn controller(api: &Arc<FakeApi>) -> DashboardController {
        DashboardController::new(api.clone())
    }

    #[tokio::test]
    async fn test_init_loads_once() {
        let api = Arc::new(FakeApi::default());
        api.push_projects(Ok(vec![
            project("1", "EXECUTING"),
            project("2", "PLANNING"),
            project("3", "MONITORING_CONTROLLING"),
        ]));
        let dashboard = controller(&api);

        let state = dashboard.init().await;
        assert_eq!(state.status, LoadStatus::Ready);
        assert_eq!(state.stats.total_projects, 3);
        assert_eq!(state.stats.planned_projects, 1);
        assert_eq!(state.stats.active_projects, 1);
        assert_eq!(state.stats.completed_projects, 1);

        dashboard.init().await;
        assert_eq!(api.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_then_retry() {
        let api = Arc::new(FakeApi::default());
        api.push_projects(Err(ApiError::NetworkError("connection refused".into())));
        api.push_projects(Ok(vec![project("1", "EXECUTING")]));
        let dashboard = controller(&api);

        let failed = dashboard.init().await;
        assert_eq!(
            failed.error(),
            Some("Network error: connection refused")
        );
        assert_eq!(failed.stats.total_projects, 0);

        let ready = dashboard.retry().await;
        assert_eq!(ready.status, LoadStatus::Ready);
        assert_eq!(ready.stats.total_projects, 1);
    }

    #[tokio::test]
    async fn test_group_filter_does_not_refetch() {
        let api = Arc::new(FakeApi::default());
        api.push_projects(Ok(vec![
            project("1", "EXECUTING"),
            project("2", "MONITORING_CONTROLLING"),
        ]));
        let dashboard = controller(&api);
        dashboard.init().await;

        let state = dashboard.set_group_filter(PhaseGroup::Completed);
        let ids: Vec<&str> = state
            .filtered_projects()
            .iter()
            .map(|p| p.project_id.as_str())
            .collect();
        assert_eq!(ids, vec!["2"]);
        assert_eq!(api.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_search_makes_no_call() {
        let api = Arc::new(FakeApi::default());
        api.push_search(Ok(SearchResults::default()));
        let dashboard = controller(&api);

        let before = dashboard.submit_search("acme").await;
        assert_eq!(before.search_results, Some(SearchResults::default()));

        for blank in ["", "   "] {
            let after = dashboard.submit_search(blank).await;
            assert_eq!(after, before);
        }
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_failure_clears_results() {
        let api = Arc::new(FakeApi::default());
        api.push_search(Ok(SearchResults {
            projects: vec![project("1", "EXECUTING")],
            ..Default::default()
        }));
        api.push_search(Err(ApiError::RequestFailed {
            status: 500,
            body: "boom".into(),
        }));
        let dashboard = controller(&api);

        let found = dashboard.submit_search("acme").await;
        assert_eq!(found.search_results.unwrap().projects.len(), 1);

        let failed = dashboard.submit_search("acme").await;
        assert_eq!(failed.search_results, None);
        assert_eq!(
            failed.search_status,
            SearchStatus::Failed("Server error: boom".into())
        );
        // Dashboard load status is untouched by search failures.
        assert_eq!(failed.status, LoadStatus::Idle);
    }

    #[tokio::test]
    async fn test_stale_load_response_is_discarded() {
        let api = Arc::new(FakeApi::default());
        let release_first = api.push_gated_projects(Ok(vec![project("old", "PLANNING")]));
        api.push_projects(Ok(vec![project("new", "EXECUTING")]));
        let dashboard = Arc::new(controller(&api));

        let slow = {
            let dashboard = dashboard.clone();
            tokio::spawn(async move { dashboard.init().await })
        };
        while api.fetch_calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }

        let fresh = dashboard.retry().await;
        assert_eq!(fresh.projects[0].project_id, "new");

        release_first.send(()).unwrap();
        slow.await.unwrap();

        let state = dashboard.snapshot();
        assert_eq!(state.projects.len(), 1);
        assert_eq!(state.projects[0].project_id, "new");
        assert_eq!(state.status, LoadStatus::Ready);
    }

    #[tokio::test]
    async fn test_view_reflects_controller_state() {
        let api = Arc::new(FakeApi::default());
        api.push_projects(Ok(vec![project("1", "EXECUTING"), project("2", "PLANNING")]));
        let dashboard = controller(&api);
        dashboard.init().await;
        dashboard.set_group_filter(PhaseGroup::Planned);

        let view = dashboard.view();
        assert_eq!(view.rows.len(), 1);
        assert!(view
            .tiles
            .iter()
            .any(|t| t.group == PhaseGroup::Planned && t.selected && t.count == 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_init_fetches_once() {
        let api = Arc::new(FakeApi::default());
        let release = api.push_gated_projects(Ok(vec![project("1", "EXECUTING")]));
        let dashboard = Arc::new(controller(&api));

        let inits: Vec<_> = (0..8)
            .map(|_| {
                let dashboard = dashboard.clone();
                tokio::spawn(async move { dashboard.init().await })
            })
            .collect();
        while api.fetch_calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }
        release.send(()).unwrap();

        for init in inits {
            init.await.unwrap();
        }
        assert_eq!(api.fetch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(dashboard.snapshot().status, LoadStatus::Ready);
    }
}
