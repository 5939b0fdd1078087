//! Patient Roster Core Library
//!
//! State and rules behind the mobile patients screen. The host renders; this
//! crate owns the list, the search projection, and the create/edit modal.
//!
//! # Architecture
//!
//! ```text
//! PatientSource ──▶ enrich ──▶ sort ──▶ PatientCollection ──▶ search ──▶ list
//!                                              ▲
//!                                              │ create / update
//!                                              │
//!                      PatientForm ──▶ ValidationRules ──▶ ValidatedPatient
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, PatientDraft, Notification, etc.)
//! - [`validation`]: Per-field rules and error maps
//! - [`form`]: Draft state for one create/edit operation
//! - [`transform`]: Demographic enrichment and newest-first sort
//! - [`store`]: The in-memory patient collection
//! - [`source`]: The upstream listing collaborator
//! - [`screen`]: Screen controller, cancellation, and notifications
//! - [`config`]: Constants and validation settings

pub mod config;
pub mod form;
pub mod models;
pub mod screen;
pub mod source;
pub mod store;
pub mod transform;
pub mod validation;

// Re-export commonly used types
pub use config::{PhonePattern, ValidationConfig};
pub use form::{FormError, ImagePick, PatientForm};
pub use models::{
    Gender, MinimalRecord, Notification, PatientDraft, PatientField, PatientRecord, Severity,
    ValidatedPatient,
};
pub use screen::{
    CancellationToken, LoadOutcome, Notifier, PatientScreen, QueuedNotifier, SaveOutcome,
    ScreenError, ScreenState, TracingNotifier,
};
pub use source::{FetchError, PatientSource};
pub use store::{PatientCollection, StoreError};
pub use transform::{enrich_patients, sort_patients_by_date};
pub use validation::{FieldErrors, ValidationRules};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

// =========================================================================
// Logging
// =========================================================================

/// Install the fmt subscriber. Safe to call more than once.
#[uniffi::export]
pub fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER)),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PatientsCoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl From<serde_json::Error> for PatientsCoreError {
    fn from(e: serde_json::Error) -> Self {
        PatientsCoreError::SerializationError(e.to_string())
    }
}

impl From<ScreenError> for PatientsCoreError {
    fn from(e: ScreenError) -> Self {
        match e {
            ScreenError::Store(StoreError::NotFound(id)) => PatientsCoreError::NotFound(id),
            ScreenError::Form(e) => PatientsCoreError::PermissionDenied(e.to_string()),
            other => PatientsCoreError::InvalidState(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for PatientsCoreError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PatientsCoreError::InvalidState(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a screen core with the default validation settings.
#[uniffi::export]
pub fn new_patients_core() -> Arc<PatientsCore> {
    PatientsCore::build(ValidationConfig::default())
}

/// Create a screen core with custom validation settings.
#[uniffi::export]
pub fn new_patients_core_with_config(config: FfiValidationConfig) -> Arc<PatientsCore> {
    PatientsCore::build(config.into())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe screen wrapper for FFI.
#[derive(uniffi::Object)]
pub struct PatientsCore {
    screen: Mutex<PatientScreen<QueuedNotifier>>,
}

impl PatientsCore {
    fn build(config: ValidationConfig) -> Arc<Self> {
        use rand::SeedableRng;

        let screen = PatientScreen::with_rng(
            QueuedNotifier::new(),
            ValidationRules::new(config),
            rand::rngs::StdRng::from_entropy(),
        );
        Arc::new(Self {
            screen: Mutex::new(screen),
        })
    }
}

#[uniffi::export]
impl PatientsCore {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Publish the raw body of the listing endpoint. Returns the list length.
    pub fn load_patients_json(&self, json: String) -> Result<u32, PatientsCoreError> {
        let mut screen = self.screen.lock()?;
        match models::parse_patients_response(&json) {
            Ok(records) => Ok(screen.apply_fetched(records) as u32),
            Err(e) => {
                screen.fail_loading(FetchError::Decode(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Report that the host's fetch failed.
    pub fn report_fetch_failure(&self, message: String) -> Result<(), PatientsCoreError> {
        let mut screen = self.screen.lock()?;
        screen.fail_loading(FetchError::Http(message));
        Ok(())
    }

    /// Whether the initial fetch is still pending.
    pub fn is_loading(&self) -> Result<bool, PatientsCoreError> {
        Ok(self.screen.lock()?.is_loading())
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn set_search_query(&self, query: String) -> Result<(), PatientsCoreError> {
        self.screen.lock()?.set_query(query);
        Ok(())
    }

    /// Patients matching the current query.
    pub fn visible_patients(&self) -> Result<Vec<FfiPatient>, PatientsCoreError> {
        let screen = self.screen.lock()?;
        Ok(screen
            .visible_patients()
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Modal Operations
    // =========================================================================

    pub fn open_create(&self) -> Result<FfiForm, PatientsCoreError> {
        let mut screen = self.screen.lock()?;
        Ok(screen.open_create()?.into())
    }

    pub fn open_edit(&self, patient_id: String) -> Result<FfiForm, PatientsCoreError> {
        let mut screen = self.screen.lock()?;
        Ok(screen.open_edit(&patient_id)?.into())
    }

    /// Set one field by its camelCase key.
    pub fn update_field(&self, field: String, value: String) -> Result<FfiForm, PatientsCoreError> {
        let field = PatientField::parse(&field)
            .ok_or_else(|| PatientsCoreError::InvalidInput(format!("unknown field {}", field)))?;
        let mut screen = self.screen.lock()?;
        screen.update_field(field, value)?;
        current_form(&screen)
    }

    /// Apply the image picker result. `uri` is `None` when the user cancelled.
    pub fn select_photo(
        &self,
        uri: Option<String>,
        permission_granted: bool,
    ) -> Result<FfiForm, PatientsCoreError> {
        let pick = match (permission_granted, uri) {
            (false, _) => ImagePick::PermissionDenied,
            (true, Some(uri)) => ImagePick::Picked(uri),
            (true, None) => ImagePick::Cancelled,
        };
        let mut screen = self.screen.lock()?;
        screen.pick_image(pick)?;
        current_form(&screen)
    }

    /// Restore the draft to what the modal opened with.
    pub fn reset_form(&self) -> Result<FfiForm, PatientsCoreError> {
        let mut screen = self.screen.lock()?;
        let form = screen
            .form_mut()
            .ok_or_else(|| PatientsCoreError::InvalidState(ScreenError::NotEditing.to_string()))?;
        form.reset();
        Ok((&*form).into())
    }

    pub fn save(&self) -> Result<FfiSaveResult, PatientsCoreError> {
        let mut screen = self.screen.lock()?;
        Ok(screen.save()?.into())
    }

    pub fn cancel_edit(&self) -> Result<(), PatientsCoreError> {
        self.screen.lock()?.cancel_edit();
        Ok(())
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Take pending toasts and alerts, oldest first.
    pub fn drain_notifications(&self) -> Result<Vec<FfiNotification>, PatientsCoreError> {
        let screen = self.screen.lock()?;
        Ok(screen
            .notifier()
            .drain()
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

fn current_form(screen: &PatientScreen<QueuedNotifier>) -> Result<FfiForm, PatientsCoreError> {
    screen
        .form()
        .map(Into::into)
        .ok_or_else(|| PatientsCoreError::InvalidState(ScreenError::NotEditing.to_string()))
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe validation settings.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiValidationConfig {
    pub name_min_len: u32,
    pub address_min_len: u32,
    pub international_phone: bool,
}

impl From<FfiValidationConfig> for ValidationConfig {
    fn from(config: FfiValidationConfig) -> Self {
        ValidationConfig {
            name_min_len: config.name_min_len as usize,
            address_min_len: config.address_min_len as usize,
            phone_pattern: if config.international_phone {
                PhonePattern::International
            } else {
                PhonePattern::LocalTenDigit
            },
            ..ValidationConfig::default()
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: Option<String>,
    pub avatar: Option<String>,
    pub photo: Option<String>,
    /// Resolved card image, see [`PatientRecord::display_image`]
    pub display_image: String,
    pub created_at: String,
    pub description: String,
}

impl From<PatientRecord> for FfiPatient {
    fn from(patient: PatientRecord) -> Self {
        let display_image = patient.display_image().to_string();
        Self {
            id: patient.id,
            name: patient.name,
            age: patient.age,
            gender: patient.gender.as_str().to_string(),
            email: patient.email,
            phone: patient.phone,
            address: patient.address,
            website: patient.website,
            avatar: patient.avatar,
            photo: patient.photo,
            display_image,
            created_at: patient.created_at,
            description: patient.description,
        }
    }
}

/// FFI-safe field value.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFieldValue {
    pub field: String,
    pub value: Option<String>,
}

/// FFI-safe inline error.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFieldError {
    pub field: String,
    pub message: String,
}

fn ffi_errors(errors: &FieldErrors) -> Vec<FfiFieldError> {
    errors
        .iter()
        .map(|(field, message)| FfiFieldError {
            field: field.as_str().to_string(),
            message: message.to_string(),
        })
        .collect()
}

/// FFI-safe snapshot of the modal.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiForm {
    pub title: String,
    pub is_edit: bool,
    pub fields: Vec<FfiFieldValue>,
    pub errors: Vec<FfiFieldError>,
}

impl From<&PatientForm> for FfiForm {
    fn from(form: &PatientForm) -> Self {
        Self {
            title: form.title().to_string(),
            is_edit: form.is_edit(),
            fields: PatientField::ALL
                .into_iter()
                .map(|field| FfiFieldValue {
                    field: field.as_str().to_string(),
                    value: form.draft().get(field).map(str::to_string),
                })
                .collect(),
            errors: ffi_errors(form.errors()),
        }
    }
}

impl From<&mut PatientForm> for FfiForm {
    fn from(form: &mut PatientForm) -> Self {
        (&*form).into()
    }
}

/// FFI-safe save result. `patient` is set on success, `errors` on failure.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSaveResult {
    pub saved: bool,
    pub patient: Option<FfiPatient>,
    pub errors: Vec<FfiFieldError>,
}

impl From<SaveOutcome> for FfiSaveResult {
    fn from(outcome: SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Created(record) | SaveOutcome::Updated(record) => Self {
                saved: true,
                patient: Some(record.into()),
                errors: Vec::new(),
            },
            SaveOutcome::Invalid(errors) => Self {
                saved: false,
                patient: None,
                errors: ffi_errors(&errors),
            },
        }
    }
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub severity: String,
    pub title: String,
    pub body: String,
}

impl From<Notification> for FfiNotification {
    fn from(notification: Notification) -> Self {
        Self {
            severity: notification.severity.as_str().to_string(),
            title: notification.title,
            body: notification.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"[
        {"id": "1", "name": "Ada Lovelace", "avatar": "", "description": "",
         "website": "", "createdAt": "2024-01-01"},
        {"id": "2", "name": "Grace Hopper", "avatar": "", "description": "",
         "website": "", "createdAt": "2024-02-01"}
    ]"#;

    #[test]
    fn test_ffi_load_and_search() {
        let core = new_patients_core();
        assert!(core.is_loading().unwrap());
        assert_eq!(core.load_patients_json(PAYLOAD.into()).unwrap(), 2);
        assert!(!core.is_loading().unwrap());

        let all = core.visible_patients().unwrap();
        assert_eq!(all[0].id, "2");
        assert_eq!(all[0].display_image, config::DEFAULT_AVATAR_URL);

        core.set_search_query("ada".into()).unwrap();
        let found = core.visible_patients().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ada Lovelace");
    }

    #[test]
    fn test_ffi_bad_payload_notifies() {
        let core = new_patients_core();
        let err = core.load_patients_json("not json".into()).unwrap_err();
        assert!(matches!(err, PatientsCoreError::SerializationError(_)));

        let notes = core.drain_notifications().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, "error");
    }

    #[test]
    fn test_ffi_create_flow() {
        let core = new_patients_core();
        core.load_patients_json("[]".into()).unwrap();

        let form = core.open_create().unwrap();
        assert_eq!(form.title, "Add Patient");

        let invalid = core.save().unwrap();
        assert!(!invalid.saved);
        assert!(invalid.errors.iter().any(|e| e.field == "name"));

        for (field, value) in [
            ("name", "Ada Lovelace"),
            ("age", "36"),
            ("gender", "Female"),
            ("email", "ada@example.com"),
            ("phone", "0123456789"),
            ("address", "12 Oak St"),
        ] {
            core.update_field(field.into(), value.into()).unwrap();
        }

        let saved = core.save().unwrap();
        assert!(saved.saved);
        assert_eq!(saved.patient.unwrap().age, 36);
        assert_eq!(core.visible_patients().unwrap().len(), 1);
    }

    #[test]
    fn test_ffi_unknown_field() {
        let core = new_patients_core();
        core.load_patients_json("[]".into()).unwrap();
        core.open_create().unwrap();
        let err = core.update_field("createdAt".into(), "x".into()).unwrap_err();
        assert!(matches!(err, PatientsCoreError::InvalidInput(_)));
    }

    #[test]
    fn test_ffi_photo_permission() {
        let core = new_patients_core();
        core.load_patients_json("[]".into()).unwrap();
        core.open_create().unwrap();

        let err = core.select_photo(None, false).unwrap_err();
        assert!(matches!(err, PatientsCoreError::PermissionDenied(_)));

        let form = core
            .select_photo(Some("file:///a.jpg".into()), true)
            .unwrap();
        let avatar = form.fields.iter().find(|f| f.field == "avatar").unwrap();
        assert_eq!(avatar.value.as_deref(), Some("file:///a.jpg"));
    }

    #[test]
    fn test_ffi_config() {
        let core = new_patients_core_with_config(FfiValidationConfig {
            name_min_len: 10,
            address_min_len: 1,
            international_phone: true,
        });
        core.load_patients_json("[]".into()).unwrap();
        core.open_create().unwrap();
        core.update_field("name".into(), "Ada".into()).unwrap();
        let result = core.save().unwrap();
        assert!(result.errors.iter().any(|e| e.field == "name"));
    }
}
