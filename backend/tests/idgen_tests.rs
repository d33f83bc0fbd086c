//! Display-id generation tests
//!
//! Conformance of the category prefix tables and the behavior of the
//! bounded retry loop.

use std::collections::HashSet;

use proptest::prelude::*;

use shared::idgen::{generate_id, IdGenError, MAX_ATTEMPTS, SUFFIX_LEN};
use shared::{AccommodationType, SportAdventureType, TransportType};

#[test]
fn accommodation_prefix_table() {
    let expected = [
        (AccommodationType::Hotels, "H"),
        (AccommodationType::Resorts, "R"),
        (AccommodationType::Homestays, "M"),
        (AccommodationType::Villas, "V"),
        (AccommodationType::Apartments, "A"),
        (AccommodationType::Guesthouses, "G"),
    ];
    for (accommodation_type, prefix) in expected {
        assert_eq!(accommodation_type.id_prefix(), prefix);
    }
}

#[test]
fn transport_prefix_table() {
    let expected = [
        (TransportType::Car, "TC"),
        (TransportType::Bus, "TB"),
        (TransportType::Train, "TT"),
        (TransportType::Flight, "TF"),
        (TransportType::Boat, "TO"),
        (TransportType::Other, "TX"),
    ];
    for (transport_type, prefix) in expected {
        assert_eq!(transport_type.id_prefix(), prefix);
    }
}

#[test]
fn sport_adventure_prefix_table() {
    let expected = [
        (SportAdventureType::Hiking, "SH"),
        (SportAdventureType::Trekking, "ST"),
        (SportAdventureType::Climbing, "SC"),
        (SportAdventureType::WaterSports, "SW"),
        (SportAdventureType::AdventureSports, "SA"),
        (SportAdventureType::Other, "SX"),
    ];
    for (activity_type, prefix) in expected {
        assert_eq!(activity_type.id_prefix(), prefix);
    }
}

#[test]
fn no_prefix_collides_across_collections() {
    // Prefixes only need to be unique within a collection, but the full
    // tables happen to be globally distinct; a collision would make
    // display ids ambiguous to humans.
    let mut all: Vec<&str> = Vec::new();
    all.extend(AccommodationType::ALL.iter().map(|t| t.id_prefix()));
    all.extend(TransportType::ALL.iter().map(|t| t.id_prefix()));
    all.extend(SportAdventureType::ALL.iter().map(|t| t.id_prefix()));

    let unique: HashSet<&str> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len());
}

#[test]
fn exhaustion_is_reported_after_the_budget() {
    assert_eq!(
        generate_id("H", |_| true),
        Err(IdGenError::GenerationExhausted(MAX_ATTEMPTS))
    );
}

#[test]
fn first_free_candidate_wins() {
    let mut taken = HashSet::new();
    for _ in 0..200 {
        let id = generate_id("TB", |candidate| taken.contains(candidate)).unwrap();
        assert!(taken.insert(id));
    }
}

proptest! {
    #[test]
    fn generated_ids_are_well_formed(prefix in "[A-Z]{1,2}") {
        let id = generate_id(&prefix, |_| false).unwrap();
        prop_assert!(id.starts_with(&prefix));
        prop_assert_eq!(id.len(), prefix.len() + SUFFIX_LEN);
        prop_assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
