// Units service
// Create-unit form submission: validates the form, attaches the unit to the
// organization draft and schedules navigation back to the dashboard.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::api::UnitsApi;
use crate::error::UnitError;
use crate::org_draft::OrgDraftStore;
use crate::types::NewUnit;

pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const UNIT_CREATED_MESSAGE: &str = "Unit created successfully!";
pub const NAME_REQUIRED_MESSAGE: &str = "Unit name is required.";
const SUBMISSION_IN_PROGRESS_MESSAGE: &str = "A unit submission is already in progress.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UnitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

/// Create-unit form fields. `manager` is collected but not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitForm {
    pub name: String,
    pub description: String,
    pub manager: String,
}

/// Route changes are owned by the front end.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigation scheduled after a successful submit.
#[derive(Debug)]
pub struct PendingNavigation {
    route: &'static str,
    handle: JoinHandle<()>,
}

impl PendingNavigation {
    pub fn route(&self) -> &'static str {
        self.route
    }

    pub fn cancel(self) {
        self.handle.abort();
    }

    /// Wait for the navigation to fire. Returns false if it was aborted.
    pub async fn wait(self) -> bool {
        self.handle.await.is_ok()
    }
}

/// Puts a still-`Submitting` status back to `Idle` when a submit future is
/// dropped before it finishes.
struct SubmittingGuard<'a> {
    status: &'a Mutex<UnitStatus>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        let mut status = self.status.lock();
        if *status == UnitStatus::Submitting {
            log::warn!("Unit submission abandoned before completion");
            *status = UnitStatus::Idle;
        }
    }
}

pub struct UnitDraftFlow {
    api: Arc<dyn UnitsApi>,
    drafts: Arc<dyn OrgDraftStore>,
    navigator: Arc<dyn Navigator>,
    navigation_delay: Duration,
    status: Mutex<UnitStatus>,
}

impl UnitDraftFlow {
    pub fn new(
        api: Arc<dyn UnitsApi>,
        drafts: Arc<dyn OrgDraftStore>,
        navigator: Arc<dyn Navigator>,
        navigation_delay: Duration,
    ) -> Self {
        Self {
            api,
            drafts,
            navigator,
            navigation_delay,
            status: Mutex::new(UnitStatus::Idle),
        }
    }

    pub fn status(&self) -> UnitStatus {
        self.status.lock().clone()
    }

    /// Name of the draft organization for the "For Organization" caption.
    pub fn organization_name(&self) -> Option<String> {
        match self.drafts.load() {
            Ok(Some(draft)) if !draft.name.is_empty() => Some(draft.name),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Could not read organization draft: {}", e);
                None
            }
        }
    }

    fn fail(&self, err: UnitError) -> UnitError {
        log::warn!("Unit submission failed: {}", err);
        *self.status.lock() = UnitStatus::Failed(err.to_string());
        err
    }

    pub async fn submit(&self, form: &UnitForm) -> Result<PendingNavigation, UnitError> {
        {
            let mut status = self.status.lock();
            if *status == UnitStatus::Submitting {
                return Err(UnitError::Validation(
                    SUBMISSION_IN_PROGRESS_MESSAGE.to_string(),
                ));
            }
            if form.name.trim().is_empty() {
                let err = UnitError::Validation(NAME_REQUIRED_MESSAGE.to_string());
                *status = UnitStatus::Failed(err.to_string());
                return Err(err);
            }
            *status = UnitStatus::Submitting;
        }
        let _guard = SubmittingGuard {
            status: &self.status,
        };

        let draft = match self.drafts.load() {
            Ok(draft) => draft,
            Err(e) => return Err(self.fail(UnitError::DraftStore(e))),
        };
        let organization_id = match draft {
            Some(draft) if !draft.organization_id.is_empty() => draft.organization_id,
            _ => return Err(self.fail(UnitError::MissingOrganization)),
        };

        let unit = NewUnit {
            name: form.name.clone(),
            description: form.description.clone(),
            organization_id,
        };
        if let Err(e) = self.api.create_unit(&unit).await {
            return Err(self.fail(UnitError::Api(e)));
        }

        *self.status.lock() = UnitStatus::Succeeded(UNIT_CREATED_MESSAGE.to_string());

        let navigator = self.navigator.clone();
        let delay = self.navigation_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(DASHBOARD_ROUTE);
        });

        Ok(PendingNavigation {
            route: DASHBOARD_ROUTE,
            handle,
        })
    }
}
