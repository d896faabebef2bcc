//! HTTP client for the project-management REST API.
//!
//! Uses reqwest with a cookie store so session credentials ride along on every
//! request, and JSON `Content-Type`/`Accept` headers on all calls.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use super::{ProjectsApi, UnitsApi};
use crate::error::ApiError;
use crate::types::{NewUnit, Project, SearchResults};

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ApiError> {
        endpoint_url(&self.base_url, path)
    }
}

fn endpoint_url(base_url: &str, path: &str) -> Result<url::Url, ApiError> {
    let raw = format!("{}/{}", base_url.trim_end_matches('/'), path);
    url::Url::parse(&raw).map_err(|e| ApiError::NetworkError(format!("Invalid URL {}: {}", raw, e)))
}

fn search_url(base_url: &str, term: &str) -> Result<url::Url, ApiError> {
    let mut url = endpoint_url(base_url, "search")?;
    url.query_pairs_mut().append_pair("searchTerm", term);
    Ok(url)
}

/// Map a finished response into `T`, or into `RequestFailed` for non-2xx.
fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::RequestFailed {
            status,
            body: body.to_string(),
        });
    }
    serde_json::from_str(body).map_err(|e| ApiError::DecodeError(e.to_string()))
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status().as_u16();
    let body = resp.text().await?;
    decode_body(status, &body)
}

#[async_trait]
impl ProjectsApi for ApiClient {
    async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError> {
        let url = self.endpoint("projects")?;
        log::debug!("GET {}", url);
        let resp = self.client.get(url).send().await?;
        let projects: Vec<Project> = read_json(resp).await?;
        log::info!("Fetched {} projects", projects.len());
        Ok(projects)
    }

    async fn search(&self, term: &str) -> Result<SearchResults, ApiError> {
        let url = search_url(&self.base_url, term)?;
        log::debug!("GET {}", url);
        let resp = self.client.get(url).send().await?;
        read_json(resp).await
    }
}

#[async_trait]
impl UnitsApi for ApiClient {
    async fn create_unit(&self, unit: &NewUnit) -> Result<(), ApiError> {
        let url = self.endpoint("units")?;
        log::debug!("POST {}", url);
        let resp = self.client.post(url).json(unit).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        log::info!("Created unit '{}' in {}", unit.name, unit.organization_id);
        Ok(())
    }
}
