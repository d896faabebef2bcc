use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Configuration stored in ~/.pmdash/config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Grace period between a successful unit creation and navigating away.
    #[serde(default = "default_navigation_delay_ms")]
    pub navigation_delay_ms: u64,
    /// Override for the organization draft file. Defaults to
    /// `~/.pmdash/org_draft.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_draft_path: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_navigation_delay_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            navigation_delay_ms: default_navigation_delay_ms(),
            org_draft_path: None,
        }
    }
}

impl Config {
    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }

    /// Resolved organization draft location.
    pub fn org_draft_path(&self) -> Result<PathBuf, ConfigError> {
        match self.org_draft_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(state_dir()?.join("org_draft.json")),
        }
    }
}

/// The state directory (~/.pmdash)
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".pmdash"))
}

/// Get the canonical config file path (~/.pmdash/config.json)
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(state_dir()?.join("config.json"))
}

/// Load configuration from ~/.pmdash/config.json, falling back to defaults
/// when the file does not exist.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    // Validate the base URL up front so the client never sees a bad one.
    url::Url::parse(&config.api_base_url).map_err(|e| {
        ConfigError::InvalidBaseUrl(config.api_base_url.clone(), e.to_string())
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
        assert_eq!(config.navigation_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{ "apiBaseUrl": "https://pm.example.com/api" }"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://pm.example.com/api");
        assert_eq!(config.navigation_delay_ms, 1000);
        assert!(config.org_draft_path.is_none());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{ "apiBaseUrl": "not a url" }"#).unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(..)));
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_org_draft_path_override() {
        let config = Config {
            org_draft_path: Some("/tmp/draft.json".into()),
            ..Default::default()
        };
        assert_eq!(
            config.org_draft_path().unwrap(),
            PathBuf::from("/tmp/draft.json")
        );
    }
}
