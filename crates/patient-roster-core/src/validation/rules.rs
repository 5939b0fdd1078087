//! Declarative per-field rules.

use std::sync::LazyLock;

use regex::Regex;

use super::{FieldErrors, ValidationResult};
use crate::config::{PhonePattern, ValidationConfig};
use crate::models::{Gender, PatientDraft, PatientField, ValidatedPatient};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9_'+\-]+(?:\.[a-z0-9_'+\-]+)*@(?:[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?\.)+[a-z]{2,}$",
    )
    .expect("email pattern")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z][a-z0-9+.\-]*://[^\s/?#@]+(?:[/?#]\S*)?$").expect("url pattern")
});

static LOCAL_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0\d{9}$").expect("local phone pattern"));

static INTERNATIONAL_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("international phone pattern"));

pub const NAME_REQUIRED: &str = "Name is required";
pub const AGE_REQUIRED: &str = "Age is required";
pub const AGE_NOT_A_NUMBER: &str = "Age must be a number";
pub const AGE_NOT_WHOLE: &str = "Age must be a whole number";
pub const AGE_TOO_LOW: &str = "Age must be positive";
pub const AGE_TOO_HIGH: &str = "Invalid age";
pub const EMAIL_INVALID: &str = "Invalid email address";
pub const PHONE_INVALID_LOCAL: &str =
    "Invalid phone number format. Must be 10 digits starting with 0";
pub const PHONE_INVALID: &str = "Invalid phone number format";
pub const ADDRESS_REQUIRED: &str = "Address is required";
pub const WEBSITE_INVALID: &str = "Invalid website URL";
pub const GENDER_REQUIRED: &str = "Gender is required";
pub const GENDER_INVALID: &str = "Invalid gender";

/// The patient schema, parameterized by [`ValidationConfig`].
#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    config: ValidationConfig,
}

impl ValidationRules {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a draft, coercing it into a typed patient.
    pub fn validate(&self, draft: &PatientDraft) -> ValidationResult<ValidatedPatient> {
        let mut errors = FieldErrors::new();

        let name = self.check_min_len(
            draft.name.as_deref(),
            self.config.name_min_len,
            PatientField::Name,
            NAME_REQUIRED,
            &mut errors,
        );
        let age = self.check_age(draft.age.as_deref(), &mut errors);
        let gender = Self::check_gender(draft.gender.as_deref(), &mut errors);
        let email = Self::check_email(draft.email.as_deref(), &mut errors);
        let phone = self.check_phone(draft.phone.as_deref(), &mut errors);
        let address = self.check_min_len(
            draft.address.as_deref(),
            self.config.address_min_len,
            PatientField::Address,
            ADDRESS_REQUIRED,
            &mut errors,
        );
        let website = Self::check_website(draft.website.as_deref(), &mut errors);

        match (name, age, gender, email, phone, address, website) {
            (Some(name), Some(age), Some(gender), Some(email), Some(phone), Some(address), Some(website))
                if errors.is_empty() =>
            {
                Ok(ValidatedPatient {
                    name,
                    age,
                    gender,
                    email,
                    phone,
                    address,
                    website,
                    avatar: non_empty(draft.avatar.as_deref()),
                    photo: non_empty(draft.photo.as_deref()),
                })
            }
            _ => Err(errors),
        }
    }

    /// The message for one field, if the draft fails on it.
    pub fn validate_field(&self, draft: &PatientDraft, field: PatientField) -> Option<String> {
        match self.validate(draft) {
            Ok(_) => None,
            Err(errors) => errors.get(field).map(str::to_string),
        }
    }

    fn check_min_len(
        &self,
        value: Option<&str>,
        min_len: usize,
        field: PatientField,
        message: &str,
        errors: &mut FieldErrors,
    ) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() && v.trim().chars().count() >= min_len => {
                Some(v.to_string())
            }
            _ => {
                errors.insert(field, message);
                None
            }
        }
    }

    fn check_age(&self, value: Option<&str>, errors: &mut FieldErrors) -> Option<u32> {
        let raw = match value.map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => {
                errors.insert(PatientField::Age, AGE_REQUIRED);
                return None;
            }
        };

        // Integral decimals and exponents ("36.0", "1e2") count as whole numbers.
        let age = match raw.parse::<i64>() {
            Ok(age) => age,
            Err(_) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v.fract() == 0.0 => v as i64,
                Ok(v) if v.is_finite() => {
                    errors.insert(PatientField::Age, AGE_NOT_WHOLE);
                    return None;
                }
                _ => {
                    errors.insert(PatientField::Age, AGE_NOT_A_NUMBER);
                    return None;
                }
            },
        };

        if age < i64::from(self.config.age_min) {
            errors.insert(PatientField::Age, AGE_TOO_LOW);
            None
        } else if age > i64::from(self.config.age_max) {
            errors.insert(PatientField::Age, AGE_TOO_HIGH);
            None
        } else {
            u32::try_from(age).ok()
        }
    }

    fn check_gender(value: Option<&str>, errors: &mut FieldErrors) -> Option<Gender> {
        match value.map(str::trim) {
            None | Some("") => {
                errors.insert(PatientField::Gender, GENDER_REQUIRED);
                None
            }
            Some(v) => {
                let gender = Gender::parse(v);
                if gender.is_none() {
                    errors.insert(PatientField::Gender, GENDER_INVALID);
                }
                gender
            }
        }
    }

    fn check_email(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
        match value {
            Some(v) if EMAIL.is_match(v) => Some(v.to_string()),
            _ => {
                errors.insert(PatientField::Email, EMAIL_INVALID);
                None
            }
        }
    }

    fn check_phone(&self, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
        let (valid, message) = match self.config.phone_pattern {
            PhonePattern::LocalTenDigit => (
                value.is_some_and(|v| LOCAL_PHONE.is_match(v)),
                PHONE_INVALID_LOCAL,
            ),
            PhonePattern::International => (
                value.is_some_and(is_international_phone),
                PHONE_INVALID,
            ),
        };

        if valid {
            value.map(str::to_string)
        } else {
            errors.insert(PatientField::Phone, message);
            None
        }
    }

    /// `Some(None)` means "absent and fine"; `None` means "invalid".
    fn check_website(value: Option<&str>, errors: &mut FieldErrors) -> Option<Option<String>> {
        match non_empty(value) {
            None => Some(None),
            Some(url) if URL.is_match(&url) => Some(Some(url)),
            Some(_) => {
                errors.insert(PatientField::Website, WEBSITE_INVALID);
                None
            }
        }
    }
}

fn is_international_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    INTERNATIONAL_PHONE.is_match(value.trim()) && (7..=15).contains(&digits)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}
