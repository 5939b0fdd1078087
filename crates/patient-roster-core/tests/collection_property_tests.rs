//! Property tests for sorting, the collection, and validation.

use chrono::{Duration, TimeZone, Utc};
use patient_roster_core::models::{Gender, PatientDraft, PatientField, PatientRecord, ValidatedPatient};
use patient_roster_core::store::PatientCollection;
use patient_roster_core::transform::{parse_created_at, sort_patients_by_date};
use patient_roster_core::validation::ValidationRules;
use proptest::prelude::*;

fn validated(name: &str) -> ValidatedPatient {
    ValidatedPatient {
        name: name.into(),
        age: 40,
        gender: Gender::Other,
        email: "p@example.com".into(),
        phone: "0123456789".into(),
        address: "9 Maple St".into(),
        website: None,
        avatar: None,
        photo: None,
    }
}

fn record(id: usize, offset_minutes: i64) -> PatientRecord {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    PatientRecord::from_validated(
        validated(&format!("Patient {}", id)),
        id.to_string(),
        (base + Duration::minutes(offset_minutes)).to_rfc3339(),
        String::new(),
    )
}

fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
}

prop_compose! {
    fn valid_draft()(
        name in "[A-Za-z]{1,12}( [A-Za-z]{1,12})?",
        age in 1u32..=150,
        gender in gender_strategy(),
        user in "[a-z]{1,10}",
        domain in "[a-z]{1,10}",
        digits in "[0-9]{9}",
        number in 1u32..9999,
        street in "[A-Z][a-z]{2,8}",
    ) -> PatientDraft {
        PatientDraft {
            name: Some(name),
            age: Some(age.to_string()),
            gender: Some(gender.to_string()),
            email: Some(format!("{}@{}.com", user, domain)),
            phone: Some(format!("0{}", digits)),
            address: Some(format!("{} {} St", number, street)),
            ..PatientDraft::default()
        }
    }
}

proptest! {
    /// Output is a permutation of the input ordered newest first.
    #[test]
    fn sort_is_ordered_permutation(offsets in proptest::collection::vec(-10_000i64..10_000, 0..40)) {
        let input: Vec<_> = offsets.iter().enumerate().map(|(i, o)| record(i, *o)).collect();
        let sorted = sort_patients_by_date(&input);

        prop_assert_eq!(sorted.len(), input.len());
        let mut in_ids: Vec<_> = input.iter().map(|p| p.id.clone()).collect();
        let mut out_ids: Vec<_> = sorted.iter().map(|p| p.id.clone()).collect();
        in_ids.sort();
        out_ids.sort();
        prop_assert_eq!(in_ids, out_ids);

        for pair in sorted.windows(2) {
            let a = parse_created_at(&pair[0].created_at).unwrap();
            let b = parse_created_at(&pair[1].created_at).unwrap();
            prop_assert!(a >= b);
        }
    }

    /// Create adds exactly one record, at the front, with an unused id.
    #[test]
    fn create_prepends_unique(count in 0usize..30) {
        let existing: Vec<_> = (0..count).map(|i| record(i, i as i64)).collect();
        let store = PatientCollection::new().replace_all(existing);

        let (next, created) = store.create(validated("New Patient"));
        prop_assert_eq!(next.len(), store.len() + 1);
        prop_assert_eq!(&next.records()[0], &created);
        prop_assert!(store.records().iter().all(|p| p.id != created.id));
    }

    /// Update touches exactly one element and pins its id.
    #[test]
    fn update_changes_only_target(count in 1usize..30, pick in any::<prop::sample::Index>()) {
        let existing: Vec<_> = (0..count).map(|i| record(i, i as i64)).collect();
        let store = PatientCollection::new().replace_all(existing);
        let target = pick.index(count);
        let id = store.records()[target].id.clone();

        let (next, updated) = store.update(validated("Renamed"), &id).unwrap();
        prop_assert_eq!(next.len(), store.len());
        prop_assert_eq!(&updated.id, &id);
        prop_assert_eq!(&updated.created_at, &store.records()[target].created_at);

        for (i, (before, after)) in store.records().iter().zip(next.records()).enumerate() {
            if i == target {
                prop_assert_eq!(&after.name, "Renamed");
            } else {
                prop_assert_eq!(before, after);
            }
        }
    }

    /// Every well-formed draft validates and keeps its values.
    #[test]
    fn valid_drafts_pass(draft in valid_draft()) {
        let rules = ValidationRules::default();
        let patient = rules.validate(&draft).unwrap();

        prop_assert_eq!(Some(patient.name.as_str()), draft.name.as_deref());
        prop_assert_eq!(Some(patient.age.to_string()), draft.age.clone());
        prop_assert_eq!(Some(patient.gender.to_string()), draft.gender.clone());
        prop_assert_eq!(Some(patient.email.as_str()), draft.email.as_deref());
        prop_assert_eq!(Some(patient.phone.as_str()), draft.phone.as_deref());
        prop_assert_eq!(Some(patient.address.as_str()), draft.address.as_deref());
    }

    /// Dropping one required field fails on exactly that field.
    #[test]
    fn missing_required_field_isolated(
        draft in valid_draft(),
        field in prop_oneof![
            Just(PatientField::Name),
            Just(PatientField::Age),
            Just(PatientField::Gender),
            Just(PatientField::Email),
            Just(PatientField::Phone),
            Just(PatientField::Address),
        ],
    ) {
        let mut draft = draft;
        draft.clear(field);

        let errors = ValidationRules::default().validate(&draft).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        prop_assert_eq!(fields, vec![field]);
    }
}

#[test]
fn worked_example_newest_first_after_load() {
    use patient_roster_core::models::MinimalRecord;
    use patient_roster_core::transform::enrich_patients;
    use rand::SeedableRng;

    let fetched = vec![
        MinimalRecord {
            id: "1".into(),
            name: "Ada".into(),
            avatar: String::new(),
            description: String::new(),
            website: String::new(),
            created_at: "2024-01-01".into(),
        },
        MinimalRecord {
            id: "2".into(),
            name: "Grace".into(),
            avatar: String::new(),
            description: String::new(),
            website: String::new(),
            created_at: "2024-02-01".into(),
        },
    ];

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
    let enriched = enrich_patients(&fetched, &mut rng);
    let store = PatientCollection::new().replace_all(sort_patients_by_date(&enriched));
    assert_eq!(store.records()[0].created_at, "2024-02-01");
}
