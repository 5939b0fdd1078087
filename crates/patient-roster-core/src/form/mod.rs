//! Form state for one create or edit operation.
//!
//! The form owns a private copy of the draft. It never touches the
//! collection: callers forward the [`ValidatedPatient`] returned by
//! [`PatientForm::validate_and_commit`].

use thiserror::Error;

use crate::models::{PatientDraft, PatientField, PatientRecord, ValidatedPatient};
use crate::validation::{FieldErrors, ValidationResult, ValidationRules};

/// Form errors outside of field validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Permission to access camera roll is required!")]
    ImagePermissionDenied,
}

/// Result reported by the host's image picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePick {
    /// User chose an image; the URI is opaque.
    Picked(String),
    /// User dismissed the picker.
    Cancelled,
    /// Media library permission was refused.
    PermissionDenied,
}

/// Draft values and inline errors for the patient modal.
#[derive(Debug, Clone)]
pub struct PatientForm {
    seed: PatientDraft,
    draft: PatientDraft,
    errors: FieldErrors,
    rules: ValidationRules,
}

impl PatientForm {
    /// Create a form seeded from an existing record, or blank when `None`.
    pub fn new(seed: Option<&PatientRecord>, rules: ValidationRules) -> Self {
        let seed = seed.map(PatientDraft::from_record).unwrap_or_default();
        Self {
            draft: seed.clone(),
            seed,
            errors: FieldErrors::new(),
            rules,
        }
    }

    /// Reload the form from a new seed, discarding the current draft.
    pub fn initialize(&mut self, seed: Option<&PatientRecord>) {
        self.seed = seed.map(PatientDraft::from_record).unwrap_or_default();
        self.draft = self.seed.clone();
        self.errors = FieldErrors::new();
    }

    /// Set one field. Its previous error is cleared until the next
    /// validation pass.
    pub fn update_field(&mut self, field: PatientField, value: impl Into<String>) {
        self.draft.set(field, value);
        self.errors.remove(field);
    }

    /// Validate the current draft. Errors are kept for display on failure.
    pub fn validate_and_commit(&mut self) -> ValidationResult<ValidatedPatient> {
        match self.rules.validate(&self.draft) {
            Ok(patient) => {
                self.errors = FieldErrors::new();
                Ok(patient)
            }
            Err(errors) => {
                tracing::debug!(count = errors.len(), "Patient form failed validation");
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Restore the seed and clear all errors.
    pub fn reset(&mut self) {
        self.draft = self.seed.clone();
        self.errors = FieldErrors::new();
    }

    /// Apply the outcome of the image picker to the avatar field.
    pub fn apply_image_pick(&mut self, pick: ImagePick) -> Result<(), FormError> {
        match pick {
            ImagePick::Picked(uri) => {
                self.update_field(PatientField::Avatar, uri);
                Ok(())
            }
            ImagePick::Cancelled => Ok(()),
            ImagePick::PermissionDenied => Err(FormError::ImagePermissionDenied),
        }
    }

    pub fn draft(&self) -> &PatientDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: PatientField) -> Option<&str> {
        self.errors.get(field)
    }

    /// Whether the form was seeded from an existing record.
    pub fn is_edit(&self) -> bool {
        self.seed.id.is_some()
    }

    /// Identity of the record being edited.
    pub fn target_id(&self) -> Option<&str> {
        self.seed.id.as_deref()
    }

    /// Modal heading.
    pub fn title(&self) -> &'static str {
        if self.is_edit() {
            "Edit Patient"
        } else {
            "Add Patient"
        }
    }

    /// Whether the draft differs from its seed.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.seed
    }
}
