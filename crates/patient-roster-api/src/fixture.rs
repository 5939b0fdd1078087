//! Canned patient source for tests and offline runs.

use std::future::Future;

use patient_roster_core::models::{parse_patients_response, MinimalRecord};
use patient_roster_core::source::{FetchError, FetchResult, PatientSource};

/// Returns the same result on every fetch.
#[derive(Debug, Clone)]
pub struct StaticPatientSource {
    result: FetchResult<Vec<MinimalRecord>>,
}

impl StaticPatientSource {
    pub fn new(records: Vec<MinimalRecord>) -> Self {
        Self {
            result: Ok(records),
        }
    }

    /// A source whose fetch always fails with `error`.
    pub fn failing(error: FetchError) -> Self {
        Self { result: Err(error) }
    }

    /// Parse a listing payload up front.
    pub fn from_json(json: &str) -> FetchResult<Self> {
        Ok(Self::new(parse_patients_response(json)?))
    }

    /// A small built-in roster.
    pub fn sample() -> Self {
        let rows = [
            ("1", "Ada Lovelace", "2024-03-10T09:15:00.000Z"),
            ("2", "Grace Hopper", "2024-05-02T14:40:00.000Z"),
            ("3", "Alan Turing", "2023-11-21T08:05:00.000Z"),
            ("4", "Katherine Johnson", "2024-01-17T17:30:00.000Z"),
        ];
        Self::new(
            rows.into_iter()
                .map(|(id, name, created_at)| MinimalRecord {
                    id: id.into(),
                    name: name.into(),
                    avatar: format!("https://avatars.example.com/{}.png", id),
                    description: String::new(),
                    website: format!("https://example.com/{}", id),
                    created_at: created_at.into(),
                })
                .collect(),
        )
    }
}

impl PatientSource for StaticPatientSource {
    fn fetch_patients(&self) -> impl Future<Output = FetchResult<Vec<MinimalRecord>>> + Send {
        let result = self.result.clone();
        async move { result }
    }
}
