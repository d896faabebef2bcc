//! Error types for dashboard and unit operations
//!
//! Errors are classified by recoverability:
//! - Retryable: transport failures, 5xx responses
//! - NonRetryable: rejected requests, malformed payloads, bad config
//! - RequiresUserAction: missing organization draft, invalid form input

use thiserror::Error;

/// Errors from the backend REST API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Server error: {}", server_error_detail(.status, .body))]
    RequestFailed { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Failed to decode response: {0}")]
    DecodeError(String),
}

fn server_error_detail(status: &u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}

impl ApiError {
    /// HTTP status of a rejected request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError(_) => true,
            ApiError::RequestFailed { status, .. } => *status >= 500,
            ApiError::DecodeError(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::DecodeError(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

/// Errors from the unit draft flow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("{0}")]
    Validation(String),

    #[error("Organization ID not found. Please create an organization first.")]
    MissingOrganization,

    #[error("Failed to read organization draft: {0}")]
    DraftStore(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl UnitError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, UnitError::Api(e) if e.is_retryable())
    }

    pub fn requires_user_action(&self) -> bool {
        matches!(
            self,
            UnitError::Validation(_) | UnitError::MissingOrganization
        )
    }
}

/// Errors loading `~/.pmdash/config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API base URL {0:?}: {1}")]
    InvalidBaseUrl(String, String),
}

/// Serializable error representation for display surfaces
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayError {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorType {
    Retryable,
    NonRetryable,
    RequiresUserAction,
}

impl From<&ApiError> for DisplayError {
    fn from(err: &ApiError) -> Self {
        let recovery_suggestion = match err {
            ApiError::NetworkError(_) => "Check that the API server is reachable and try again.",
            ApiError::RequestFailed { status, .. } if *status == 401 || *status == 403 => {
                "Sign in again and retry."
            }
            ApiError::RequestFailed { status, .. } if *status >= 500 => {
                "The server failed to handle the request. Try again shortly."
            }
            ApiError::RequestFailed { .. } => "Check the request details and try again.",
            ApiError::DecodeError(_) => "The server returned an unexpected payload.",
        };
        DisplayError {
            message: err.to_string(),
            error_type: if err.is_retryable() {
                ErrorType::Retryable
            } else {
                ErrorType::NonRetryable
            },
            can_retry: err.is_retryable(),
            recovery_suggestion: recovery_suggestion.to_string(),
        }
    }
}

impl From<&UnitError> for DisplayError {
    fn from(err: &UnitError) -> Self {
        let recovery_suggestion = match err {
            UnitError::Api(api) => return DisplayError::from(api),
            UnitError::Validation(_) => "Fill in the required fields.",
            UnitError::MissingOrganization => "Create an organization before adding units.",
            UnitError::DraftStore(_) => "Check the organization draft file is valid JSON.",
        };
        DisplayError {
            message: err.to_string(),
            error_type: if err.requires_user_action() {
                ErrorType::RequiresUserAction
            } else {
                ErrorType::NonRetryable
            },
            can_retry: false,
            recovery_suggestion: recovery_suggestion.to_string(),
        }
    }
}
