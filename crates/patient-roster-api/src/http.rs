//! HTTP client for the patient listing endpoint.

use std::future::Future;

use patient_roster_core::models::{parse_patients_response, MinimalRecord};
use patient_roster_core::source::{FetchError, FetchResult, PatientSource};

use crate::config::{ApiConfig, ConfigError};

/// Fetches `GET {base_url}users`. Dropping the fetch future aborts the
/// request. No retries.
#[derive(Debug, Clone)]
pub struct HttpPatientSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPatientSource {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: config.users_url(),
        })
    }

    /// Configure from [`ApiConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&ApiConfig::from_env()?)
    }

    /// Configure from [`ApiConfig::from_lookup`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(&ApiConfig::from_lookup(lookup)?)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PatientSource for HttpPatientSource {
    fn fetch_patients(&self) -> impl Future<Output = FetchResult<Vec<MinimalRecord>>> + Send {
        let request = self.client.get(&self.url);
        let url = self.url.clone();

        async move {
            tracing::debug!(url = %url, "Fetching patients");
            let response = request
                .send()
                .await
                .map_err(|e| FetchError::Http(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = response
                .text()
                .await
                .map_err(|e| FetchError::Http(e.to_string()))?;
            let records = parse_patients_response(&body)?;

            tracing::debug!(count = records.len(), "Fetched patients");
            Ok(records)
        }
    }
}
