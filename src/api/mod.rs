//! Backend REST API access.
//!
//! The dashboard and the unit draft flow talk to the backend through the
//! `ProjectsApi` and `UnitsApi` traits; `ApiClient` is the reqwest-backed
//! implementation of both.

pub mod client;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{NewUnit, Project, SearchResults};

pub use client::ApiClient;

#[async_trait]
pub trait ProjectsApi: Send + Sync {
    /// `GET /projects`
    async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// `GET /search?searchTerm=...`. Callers must not pass a blank term.
    async fn search(&self, term: &str) -> Result<SearchResults, ApiError>;
}

#[async_trait]
pub trait UnitsApi: Send + Sync {
    /// `POST /units`
    async fn create_unit(&self, unit: &NewUnit) -> Result<(), ApiError>;
}
