//! Application constants and tunable validation settings.

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "Patient Roster";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "patient_roster_core=info,patient_roster_api=info";

/// Street names used when synthesizing addresses.
pub const STREET_NAMES: [&str; 5] = ["Main", "Oak", "Maple", "Cedar", "Pine"];

/// Half-open age range for synthesized patients.
/// Shown when a patient has neither a photo nor an avatar.
pub const DEFAULT_AVATAR_URL: &str =
    "https://static-00.iconduck.com/assets.00/avatar-default-icon-2048x2048-h6w375ur.png";

pub const ENRICHED_AGE_RANGE: std::ops::Range<u32> = 18..90;

/// Accepted phone number shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhonePattern {
    /// Exactly ten digits with a leading zero, e.g. `0123456789`.
    LocalTenDigit,
    /// Free-form international: optional `+`, digits, spaces, dashes and
    /// parentheses, 7 to 15 digits in total.
    International,
}

/// Field constraints applied by [`crate::validation::ValidationRules`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum trimmed length of the name
    pub name_min_len: usize,
    /// Minimum trimmed length of the address
    pub address_min_len: usize,
    /// Inclusive lower age bound
    pub age_min: u32,
    /// Inclusive upper age bound
    pub age_max: u32,
    /// Phone number shape
    pub phone_pattern: PhonePattern,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name_min_len: 1,
            address_min_len: 1,
            age_min: 1,
            age_max: 150,
            phone_pattern: PhonePattern::LocalTenDigit,
        }
    }
}
