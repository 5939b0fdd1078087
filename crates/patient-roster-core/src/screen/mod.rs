//! Screen controller: fetch, search, and the create/edit modal.
//!
//! ```text
//!   Loading ──fetch ok / fetch failed──▶ Ready ◀──save / cancel──┐
//!                                          │                      │
//!                                          └──open_create/edit──▶ Editing
//! ```
//!
//! The controller owns the [`PatientCollection`] and the modal's
//! [`PatientForm`]. It is driven from a single event loop; `load` is the
//! only suspension point.

mod cancel;
mod notify;

pub use cancel::*;
pub use notify::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::form::{FormError, ImagePick, PatientForm};
use crate::models::{MinimalRecord, Notification, PatientField, PatientRecord};
use crate::source::{FetchError, PatientSource};
use crate::store::{PatientCollection, StoreError};
use crate::transform::{enrich_patients, sort_patients_by_date};
use crate::validation::{FieldErrors, ValidationRules};

pub const FETCH_FAILED: &str = "Failed to fetch patients";
pub const PATIENT_CREATED: &str = "Patient created successfully";
pub const PATIENT_UPDATED: &str = "Patient updated successfully";
pub const PERMISSION_TITLE: &str = "Permission required";

/// Screen errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error("Screen is not ready")]
    NotReady,

    #[error("No patient is being edited")]
    NotEditing,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Form(#[from] FormError),
}

pub type ScreenResult<T> = Result<T, ScreenError>;

/// Where the screen is in its lifecycle.
#[derive(Debug, Clone)]
pub enum ScreenState {
    /// Waiting for the initial fetch
    Loading,
    /// List visible, no modal
    Ready,
    /// Modal open with a draft in progress
    Editing(PatientForm),
}

/// Result of [`PatientScreen::load`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Collection replaced with this many patients
    Loaded(usize),
    /// Fetch failed; collection unchanged
    Failed(FetchError),
    /// Token fired first; nothing changed
    Cancelled,
}

/// Result of [`PatientScreen::save`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(PatientRecord),
    Updated(PatientRecord),
    /// Draft failed validation; the modal stays open
    Invalid(FieldErrors),
}

/// Controller for the patients list screen.
#[derive(Debug)]
pub struct PatientScreen<N: Notifier, R: Rng = StdRng> {
    collection: PatientCollection,
    query: String,
    state: ScreenState,
    rules: ValidationRules,
    notifier: N,
    rng: R,
}

impl<N: Notifier> PatientScreen<N, StdRng> {
    /// Screen with default rules and an entropy-seeded random source.
    pub fn new(notifier: N) -> Self {
        Self::with_rng(notifier, ValidationRules::default(), StdRng::from_entropy())
    }
}

impl<N: Notifier, R: Rng> PatientScreen<N, R> {
    pub fn with_rng(notifier: N, rules: ValidationRules, rng: R) -> Self {
        Self {
            collection: PatientCollection::new(),
            query: String::new(),
            state: ScreenState::Loading,
            rules,
            notifier,
            rng,
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch, enrich, sort and publish the patient list.
    ///
    /// If `token` fires before the fetch resolves, the request future is
    /// dropped and nothing on the screen changes.
    pub async fn load<S: PatientSource>(
        &mut self,
        source: &S,
        token: &CancellationToken,
    ) -> LoadOutcome {
        if token.is_cancelled() {
            return LoadOutcome::Cancelled;
        }
        let refreshing = matches!(self.state, ScreenState::Ready);
        if refreshing {
            self.state = ScreenState::Loading;
        }

        let fetched = tokio::select! {
            biased;
            () = token.cancelled() => None,
            result = source.fetch_patients() => Some(result),
        };

        match fetched {
            None => {
                tracing::debug!("Patient fetch cancelled");
                self.abandon_loading(refreshing);
                LoadOutcome::Cancelled
            }
            Some(_) if token.is_cancelled() => {
                tracing::debug!("Patient fetch resolved after cancellation; discarded");
                self.abandon_loading(refreshing);
                LoadOutcome::Cancelled
            }
            Some(Ok(records)) => LoadOutcome::Loaded(self.apply_fetched(records)),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Failed to fetch patients");
                self.notifier
                    .notify(Notification::error("Error", FETCH_FAILED));
                self.finish_loading();
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Publish records fetched by the host. Returns the new list length.
    pub fn apply_fetched(&mut self, records: Vec<MinimalRecord>) -> usize {
        let enriched = enrich_patients(&records, &mut self.rng);
        let sorted = sort_patients_by_date(&enriched);
        self.collection = self.collection.replace_all(sorted);
        self.finish_loading();
        tracing::info!(count = self.collection.len(), "Patients loaded");
        self.collection.len()
    }

    /// Report a host-side fetch failure.
    pub fn fail_loading(&mut self, error: FetchError) {
        tracing::warn!(error = %error, "Failed to fetch patients");
        self.notifier
            .notify(Notification::error("Error", FETCH_FAILED));
        self.finish_loading();
    }

    /// Undo the `Ready -> Loading` switch made by a cancelled refresh.
    fn abandon_loading(&mut self, refreshing: bool) {
        if refreshing && matches!(self.state, ScreenState::Loading) {
            self.state = ScreenState::Ready;
        }
    }

    fn finish_loading(&mut self) {
        if matches!(self.state, ScreenState::Loading) {
            self.state = ScreenState::Ready;
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Patients matching the current query, in collection order.
    pub fn visible_patients(&self) -> Vec<&PatientRecord> {
        self.collection.search(&self.query)
    }

    // =========================================================================
    // Modal
    // =========================================================================

    /// Open the modal with a blank draft.
    pub fn open_create(&mut self) -> ScreenResult<&mut PatientForm> {
        self.open(None)
    }

    /// Open the modal seeded from the patient with identity `id`.
    pub fn open_edit(&mut self, id: &str) -> ScreenResult<&mut PatientForm> {
        let record = self
            .collection
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.open(Some(&record))
    }

    fn open(&mut self, seed: Option<&PatientRecord>) -> ScreenResult<&mut PatientForm> {
        if !matches!(self.state, ScreenState::Ready) {
            return Err(ScreenError::NotReady);
        }
        self.state = ScreenState::Editing(PatientForm::new(seed, self.rules.clone()));
        self.form_mut().ok_or(ScreenError::NotEditing)
    }

    pub fn form(&self) -> Option<&PatientForm> {
        match &self.state {
            ScreenState::Editing(form) => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut PatientForm> {
        match &mut self.state {
            ScreenState::Editing(form) => Some(form),
            _ => None,
        }
    }

    pub fn update_field(&mut self, field: PatientField, value: impl Into<String>) -> ScreenResult<()> {
        self.form_mut()
            .ok_or(ScreenError::NotEditing)?
            .update_field(field, value);
        Ok(())
    }

    /// Apply an image-picker result. A permission denial raises a blocking
    /// alert and leaves the draft unchanged.
    pub fn pick_image(&mut self, pick: ImagePick) -> ScreenResult<()> {
        let form = self.form_mut().ok_or(ScreenError::NotEditing)?;
        if let Err(e) = form.apply_image_pick(pick) {
            self.notifier
                .notify(Notification::error(PERMISSION_TITLE, e.to_string()));
            return Err(e.into());
        }
        Ok(())
    }

    /// Validate the draft and write it to the collection.
    pub fn save(&mut self) -> ScreenResult<SaveOutcome> {
        let form = self.form_mut().ok_or(ScreenError::NotEditing)?;
        let patient = match form.validate_and_commit() {
            Ok(patient) => patient,
            Err(errors) => return Ok(SaveOutcome::Invalid(errors)),
        };
        let target = form.target_id().map(str::to_string);

        let outcome = match target {
            Some(id) => {
                let (next, record) = self.collection.update(patient, &id)?;
                self.collection = next;
                self.notifier.notify(Notification::success(PATIENT_UPDATED));
                SaveOutcome::Updated(record)
            }
            None => {
                let (next, record) = self.collection.create(patient);
                self.collection = next;
                self.notifier.notify(Notification::success(PATIENT_CREATED));
                SaveOutcome::Created(record)
            }
        };

        self.state = ScreenState::Ready;
        Ok(outcome)
    }

    /// Close the modal, discarding the draft.
    pub fn cancel_edit(&mut self) {
        if matches!(self.state, ScreenState::Editing(_)) {
            self.state = ScreenState::Ready;
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ScreenState::Loading)
    }

    pub fn collection(&self) -> &PatientCollection {
        &self.collection
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
