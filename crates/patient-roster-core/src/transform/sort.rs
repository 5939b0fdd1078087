//! Newest-first ordering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::PatientRecord;

/// Parse a creation timestamp. Accepts RFC 3339, a naive date-time (treated
/// as UTC) or a bare `YYYY-MM-DD` date.
pub fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Return a copy of `patients` ordered by `createdAt`, most recent first.
pub fn sort_patients_by_date(patients: &[PatientRecord]) -> Vec<PatientRecord> {
    let mut sorted = patients.to_vec();
    sorted.sort_by_cached_key(|p| std::cmp::Reverse(parse_created_at(&p.created_at)));
    sorted
}
