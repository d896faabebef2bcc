//! Project-management dashboard core.
//!
//! Typed access to the projects REST API, phase-group classification, the
//! dashboard view-model and the create-unit flow. Rendering and routing are
//! left to the front end; see `main.rs` for the terminal one.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod org_draft;
pub mod phase;
pub mod services;
pub mod types;

pub use api::{ApiClient, ProjectsApi, UnitsApi};
pub use config::Config;
pub use dashboard::{reduce, DashboardEvent, DashboardState, DashboardView, LoadStatus, SearchStatus};
pub use error::{ApiError, UnitError};
pub use phase::{classify, matches_group, DashboardStats, PhaseGroup};
pub use services::dashboard::DashboardController;
pub use services::units::{Navigator, PendingNavigation, UnitDraftFlow, UnitForm, UnitStatus};
