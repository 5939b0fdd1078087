//! Demographic backfill for records from the listing endpoint.
//!
//! The upstream source only carries identity, name, avatar and a few
//! passthrough fields. Everything else is synthesized from the injected
//! random source, shaped so that enriched records pass the default
//! validation rules if the user later opens them for editing.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{ENRICHED_AGE_RANGE, STREET_NAMES};
use crate::models::{Gender, MinimalRecord, PatientRecord};

/// Enrich every record, preserving order.
pub fn enrich_patients<R: Rng + ?Sized>(
    records: &[MinimalRecord],
    rng: &mut R,
) -> Vec<PatientRecord> {
    records.iter().map(|r| enrich_patient(r, rng)).collect()
}

/// Fill in gender, age, address, phone and email for one record.
pub fn enrich_patient<R: Rng + ?Sized>(record: &MinimalRecord, rng: &mut R) -> PatientRecord {
    let gender = *Gender::ALL.choose(rng).unwrap_or(&Gender::Other);
    let age = rng.gen_range(ENRICHED_AGE_RANGE);
    let street = STREET_NAMES.choose(rng).copied().unwrap_or("Main");
    let address = format!("{} {} St", rng.gen_range(0..9999), street);
    let phone = format!("0{}", rng.gen_range(100_000_000u32..=999_999_999));
    let email = format!("patient{}@example.com", rng.gen_range(0..10_000));

    PatientRecord {
        id: record.id.clone(),
        name: record.name.clone(),
        age,
        gender,
        email,
        phone,
        address,
        website: non_empty(&record.website),
        avatar: non_empty(&record.avatar),
        photo: None,
        created_at: record.created_at.clone(),
        description: record.description.clone(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
