//! Patient models.

use serde::{Deserialize, Serialize};

/// Gender options offered by the form dropdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Every selectable gender, in dropdown order.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Display label (also the stored value).
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient as returned by the upstream listing endpoint, before enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MinimalRecord {
    /// Upstream identifier
    pub id: String,
    /// Full name
    pub name: String,
    /// Remote image URI
    #[serde(default, alias = "avatarUri")]
    pub avatar: String,
    /// Free text, passed through untouched
    #[serde(default)]
    pub description: String,
    /// Personal website
    #[serde(default)]
    pub website: String,
    /// ISO-8601 creation timestamp
    pub created_at: String,
}

/// A fully populated patient as held by the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Unique within the collection
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Remote or local image URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Locally captured photo URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// ISO-8601, never changed after assignment
    pub created_at: String,
    #[serde(default)]
    pub description: String,
}

impl PatientRecord {
    /// Assemble a stored record from validated form output plus the
    /// store-owned fields.
    pub fn from_validated(
        patient: ValidatedPatient,
        id: String,
        created_at: String,
        description: String,
    ) -> Self {
        Self {
            id,
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            email: patient.email,
            phone: patient.phone,
            address: patient.address,
            website: patient.website,
            avatar: patient.avatar,
            photo: patient.photo,
            created_at,
            description,
        }
    }

    /// Case-insensitive substring match on the name. `needle` must already be
    /// lowercase.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    /// Image for the list card: the picked photo, then the avatar, then the
    /// stock placeholder.
    pub fn display_image(&self) -> &str {
        [self.photo.as_deref(), self.avatar.as_deref()]
            .into_iter()
            .flatten()
            .find(|uri| !uri.is_empty())
            .unwrap_or(crate::config::DEFAULT_AVATAR_URL)
    }
}

/// Output of a successful validation pass: every form-editable field, typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedPatient {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: Option<String>,
    pub avatar: Option<String>,
    pub photo: Option<String>,
}

/// Parse the listing endpoint's JSON body.
pub fn parse_patients_response(json: &str) -> Result<Vec<MinimalRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse(" FEMALE "), Some(Gender::Female));
        assert_eq!(Gender::parse("Other"), Some(Gender::Other));
        assert_eq!(Gender::parse(""), None);
        assert_eq!(Gender::parse("unknown"), None);
    }

    #[test]
    fn test_display_image_precedence() {
        let mut patient = PatientRecord {
            id: "1".into(),
            name: "Ada".into(),
            age: 36,
            gender: Gender::Female,
            email: "ada@example.com".into(),
            phone: "0123456789".into(),
            address: "1 Main St".into(),
            website: None,
            avatar: Some("https://example.com/avatar.png".into()),
            photo: Some("file:///photo.jpg".into()),
            created_at: "2024-01-01".into(),
            description: String::new(),
        };
        assert_eq!(patient.display_image(), "file:///photo.jpg");

        patient.photo = Some(String::new());
        assert_eq!(patient.display_image(), "https://example.com/avatar.png");

        patient.avatar = None;
        assert_eq!(patient.display_image(), crate::config::DEFAULT_AVATAR_URL);
    }

    #[test]
    fn test_parse_minimal_records() {
        let json = r#"[
            {
                "createdAt": "2024-02-01T10:00:00.000Z",
                "name": "Ada Lovelace",
                "avatar": "https://example.com/a.png",
                "description": "First programmer",
                "website": "https://ada.example.com",
                "id": "1"
            },
            {
                "createdAt": "2024-01-01",
                "name": "Grace Hopper",
                "avatarUri": "https://example.com/g.png",
                "id": "2",
                "extra": true
            }
        ]"#;

        let records = parse_patients_response(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Ada Lovelace");
        assert_eq!(records[0].created_at, "2024-02-01T10:00:00.000Z");
        assert_eq!(records[1].avatar, "https://example.com/g.png");
        assert_eq!(records[1].description, "");
    }

    #[test]
    fn test_record_json_is_camel_case() {
        let record = PatientRecord {
            id: "7".into(),
            name: "Ada".into(),
            age: 36,
            gender: Gender::Female,
            email: "ada@example.com".into(),
            phone: "0123456789".into(),
            address: "12 Oak St".into(),
            website: None,
            avatar: None,
            photo: None,
            created_at: "2024-01-01T00:00:00Z".into(),
            description: String::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
        assert_eq!(json["gender"], "Female");
        assert!(json.get("website").is_none());
    }

    #[test]
    fn test_name_contains() {
        let json = r#"{"id":"1","name":"Ada Lovelace","age":36,"gender":"Female",
            "email":"a@b.com","phone":"0123456789","address":"1 Main St",
            "createdAt":"2024-01-01"}"#;
        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert!(record.name_contains("love"));
        assert!(!record.name_contains("hopper"));
    }
}
