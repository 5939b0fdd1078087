//! The upstream listing collaborator.

use std::future::Future;

use thiserror::Error;

use crate::models::MinimalRecord;

/// Fetch errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Something that can list patients. Dropping the returned future must abort
/// the request.
pub trait PatientSource {
    fn fetch_patients(&self) -> impl Future<Output = FetchResult<Vec<MinimalRecord>>> + Send;
}
