//! Draft models for the create/edit form.

use serde::{Deserialize, Serialize};

use super::patient::PatientRecord;

/// A user-editable field of the patient form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PatientField {
    Name,
    Age,
    Gender,
    Email,
    Phone,
    Address,
    Website,
    Avatar,
    Photo,
}

impl PatientField {
    /// All fields, in form order.
    pub const ALL: [PatientField; 9] = [
        PatientField::Name,
        PatientField::Age,
        PatientField::Gender,
        PatientField::Email,
        PatientField::Phone,
        PatientField::Address,
        PatientField::Website,
        PatientField::Avatar,
        PatientField::Photo,
    ];

    /// The camelCase key used by the host UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientField::Name => "name",
            PatientField::Age => "age",
            PatientField::Gender => "gender",
            PatientField::Email => "email",
            PatientField::Phone => "phone",
            PatientField::Address => "address",
            PatientField::Website => "website",
            PatientField::Avatar => "avatar",
            PatientField::Photo => "photo",
        }
    }

    /// Look up a field by its key. `avatarUri`/`photoUri` are accepted too.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "avatarUri" => return Some(PatientField::Avatar),
            "photoUri" => return Some(PatientField::Photo),
            _ => {}
        }
        Self::ALL.into_iter().find(|f| f.as_str() == key)
    }
}

impl std::fmt::Display for PatientField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-progress form state for one patient. Every field may be missing or
/// invalid; `age` keeps the raw text until validation coerces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub avatar: Option<String>,
    pub photo: Option<String>,
    /// Identity of the record being edited (read-only)
    pub id: Option<String>,
    /// Creation timestamp of the record being edited (read-only)
    pub created_at: Option<String>,
    /// Passthrough text of the record being edited (read-only)
    pub description: Option<String>,
}

impl PatientDraft {
    /// The blank template used by "Add Patient".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Copy an existing record into a fresh draft.
    pub fn from_record(record: &PatientRecord) -> Self {
        Self {
            name: Some(record.name.clone()),
            age: Some(record.age.to_string()),
            gender: Some(record.gender.as_str().to_string()),
            email: Some(record.email.clone()),
            phone: Some(record.phone.clone()),
            address: Some(record.address.clone()),
            website: record.website.clone(),
            avatar: record.avatar.clone(),
            photo: record.photo.clone(),
            id: Some(record.id.clone()),
            created_at: Some(record.created_at.clone()),
            description: Some(record.description.clone()),
        }
    }

    /// Current value of an editable field.
    pub fn get(&self, field: PatientField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Overwrite an editable field.
    pub fn set(&mut self, field: PatientField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Remove an editable field's value.
    pub fn clear(&mut self, field: PatientField) {
        *self.slot_mut(field) = None;
    }

    fn slot(&self, field: PatientField) -> &Option<String> {
        match field {
            PatientField::Name => &self.name,
            PatientField::Age => &self.age,
            PatientField::Gender => &self.gender,
            PatientField::Email => &self.email,
            PatientField::Phone => &self.phone,
            PatientField::Address => &self.address,
            PatientField::Website => &self.website,
            PatientField::Avatar => &self.avatar,
            PatientField::Photo => &self.photo,
        }
    }

    fn slot_mut(&mut self, field: PatientField) -> &mut Option<String> {
        match field {
            PatientField::Name => &mut self.name,
            PatientField::Age => &mut self.age,
            PatientField::Gender => &mut self.gender,
            PatientField::Email => &mut self.email,
            PatientField::Phone => &mut self.phone,
            PatientField::Address => &mut self.address,
            PatientField::Website => &mut self.website,
            PatientField::Avatar => &mut self.avatar,
            PatientField::Photo => &mut self.photo,
        }
    }
}
