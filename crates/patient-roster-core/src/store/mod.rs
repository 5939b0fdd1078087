//! In-memory patient collection.
//!
//! The collection is a plain value. Every mutation returns a new collection
//! and leaves the receiver untouched, so the screen decides when a change
//! becomes visible.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{PatientRecord, ValidatedPatient};

/// Collection errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Patient not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The authoritative list of patients for one screen session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientCollection {
    records: Vec<PatientRecord>,
}

impl PatientCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the list wholesale.
    pub fn replace_all(&self, records: Vec<PatientRecord>) -> Self {
        tracing::debug!(count = records.len(), "Replacing patient collection");
        Self { records }
    }

    /// Add a patient at the front with a fresh id and the current time.
    pub fn create(&self, patient: ValidatedPatient) -> (Self, PatientRecord) {
        self.create_at(patient, Utc::now())
    }

    /// Add a patient at the front with a fresh id, stamped with `now`.
    pub fn create_at(&self, patient: ValidatedPatient, now: DateTime<Utc>) -> (Self, PatientRecord) {
        let id = self.fresh_id();
        let record = PatientRecord::from_validated(patient, id, now.to_rfc3339(), String::new());

        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.push(record.clone());
        records.extend(self.records.iter().cloned());

        tracing::info!(id = %record.id, "Created patient");
        (Self { records }, record)
    }

    /// Replace the patient with identity `id`. The id, creation time and
    /// description of the stored record are kept.
    pub fn update(&self, patient: ValidatedPatient, id: &str) -> StoreResult<(Self, PatientRecord)> {
        let index = self
            .records
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let existing = &self.records[index];
        let record = PatientRecord::from_validated(
            patient,
            id.to_string(),
            existing.created_at.clone(),
            existing.description.clone(),
        );

        let mut records = self.records.clone();
        records[index] = record.clone();

        tracing::info!(id = %id, "Updated patient");
        Ok((Self { records }, record))
    }

    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.records.iter().find(|p| p.id == id)
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Patients whose name contains `query`, ignoring case. A blank query
    /// matches everything.
    pub fn search(&self, query: &str) -> Vec<&PatientRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|p| p.name_contains(&needle))
            .collect()
    }

    fn fresh_id(&self) -> String {
        let taken: HashSet<&str> = self.records.iter().map(|p| p.id.as_str()).collect();
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if !taken.contains(id.as_str()) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn validated(name: &str) -> ValidatedPatient {
        ValidatedPatient {
            name: name.into(),
            age: 30,
            gender: Gender::Male,
            email: "a@b.com".into(),
            phone: "0123456789".into(),
            address: "1 Main St".into(),
            website: None,
            avatar: None,
            photo: None,
        }
    }

    fn stored(id: &str, name: &str) -> PatientRecord {
        PatientRecord::from_validated(
            validated(name),
            id.into(),
            "2024-01-01T00:00:00Z".into(),
            "from upstream".into(),
        )
    }

    #[test]
    fn test_replace_all() {
        let store = PatientCollection::new();
        let store = store.replace_all(vec![stored("1", "Ada"), stored("2", "Grace")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("2").unwrap().name, "Grace");
    }

    #[test]
    fn test_create_prepends_with_fresh_id() {
        let store = PatientCollection::new().replace_all(vec![stored("1", "Ada")]);
        let (next, record) = store.create(validated("Grace"));

        assert_eq!(store.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.records()[0], record);
        assert_ne!(record.id, "1");
        assert_eq!(record.id.len(), 36);
        assert!(record.description.is_empty());
    }

    #[test]
    fn test_create_at_stamps_time() {
        let now = DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc);
        let (_, record) = PatientCollection::new().create_at(validated("Ada"), now);
        assert_eq!(record.created_at, now.to_rfc3339());
    }

    #[test]
    fn test_update_replaces_in_place() {
        let store = PatientCollection::new().replace_all(vec![
            stored("1", "Ada"),
            stored("2", "Grace"),
            stored("3", "Linus"),
        ]);

        let (next, record) = store.update(validated("Grace Hopper"), "2").unwrap();
        assert_eq!(next.len(), 3);
        assert_eq!(next.records()[1], record);
        assert_eq!(record.id, "2");
        assert_eq!(record.name, "Grace Hopper");
        assert_eq!(record.created_at, "2024-01-01T00:00:00Z");
        assert_eq!(record.description, "from upstream");
        assert_eq!(next.records()[0], store.records()[0]);
        assert_eq!(next.records()[2], store.records()[2]);
        assert_eq!(store.get("2").unwrap().name, "Grace");
    }

    #[test]
    fn test_update_unknown_id() {
        let store = PatientCollection::new().replace_all(vec![stored("1", "Ada")]);
        let err = store.update(validated("Nobody"), "missing").unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".into()));
    }

    #[test]
    fn test_search_case_insensitive() {
        let store = PatientCollection::new().replace_all(vec![
            stored("1", "Ada Lovelace"),
            stored("2", "Grace Hopper"),
            stored("3", "ADAM Smith"),
        ]);

        let names: Vec<_> = store.search("ada").iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ada Lovelace", "ADAM Smith"]);
        assert_eq!(store.search("   ").len(), 3);
        assert!(store.search("zzz").is_empty());
    }
}
