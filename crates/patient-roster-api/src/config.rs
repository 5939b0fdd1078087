//! Endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "PATIENTS_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const API_TIMEOUT_VAR: &str = "PATIENTS_API_TIMEOUT_SECS";
/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Where and how to reach the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.example.com/v1/`
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read [`API_URL_VAR`] and [`API_TIMEOUT_VAR`] from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(API_URL_VAR))?;

        let timeout = match lookup(API_TIMEOUT_VAR) {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    var: API_TIMEOUT_VAR,
                    value: raw.clone(),
                })?,
        };

        Ok(Self { base_url, timeout })
    }

    /// The patient listing URL: `{base_url}users`.
    pub fn users_url(&self) -> String {
        let base = self.base_url.trim();
        if base.ends_with('/') {
            format!("{}users", base)
        } else {
            format!("{}/users", base)
        }
    }
}
