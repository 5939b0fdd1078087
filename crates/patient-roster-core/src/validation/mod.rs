//! Field validation for patient drafts.
//!
//! Validation is all-or-nothing: a draft either coerces into a
//! [`ValidatedPatient`] or yields a [`FieldErrors`] map with one message per
//! failing field. Nothing partial is returned.

mod rules;

pub use rules::*;

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::models::PatientField;

/// Per-field error messages from a failed validation pass.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct FieldErrors {
    errors: BTreeMap<PatientField, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message, keeping the first one if the field already failed.
    pub fn insert(&mut self, field: PatientField, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    /// Drop the message for one field.
    pub fn remove(&mut self, field: PatientField) -> Option<String> {
        self.errors.remove(&field)
    }

    pub fn get(&self, field: PatientField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: PatientField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failing fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = PatientField> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatientField, &str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

pub type ValidationResult<T> = Result<T, FieldErrors>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert(PatientField::Age, "Age is required");
        errors.insert(PatientField::Age, "Invalid age");
        assert_eq!(errors.get(PatientField::Age), Some("Age is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_fields_in_form_order() {
        let mut errors = FieldErrors::new();
        errors.insert(PatientField::Phone, "bad phone");
        errors.insert(PatientField::Name, "bad name");
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec![PatientField::Name, PatientField::Phone]);
        assert_eq!(errors.to_string(), "2 field(s) failed validation");
    }
}
