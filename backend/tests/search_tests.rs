//! Inventory search and grouping tests against the real listing models

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    filter_inventory, group_by_category, Accommodation, AccommodationType, Address, Room,
    SportAdventure, SportAdventureType,
};

fn room(room_type: &str, price: i64) -> Room {
    Room {
        room_number: "101".to_string(),
        room_type: room_type.to_string(),
        price_per_night: Decimal::from(price),
        number_of_beds: 2,
        facilities: vec!["WiFi".to_string(), "Hot Water".to_string()],
        amenities: vec!["Air Conditioning".to_string()],
        description: String::new(),
        image: None,
    }
}

fn accommodation(
    name: &str,
    accommodation_type: AccommodationType,
    city: &str,
    rooms: Vec<Room>,
) -> Accommodation {
    Accommodation {
        id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
        accommodation_id: format!("{}TEST01", accommodation_type.id_prefix()),
        accommodation_type,
        name: name.to_string(),
        owner_name: "Owner".to_string(),
        address: Address {
            street: "1 Main Street".to_string(),
            city: city.to_string(),
            state: "Southern".to_string(),
            postal_code: "80000".to_string(),
        },
        main_image: None,
        terms_and_conditions: String::new(),
        nearby_locations: vec!["Lighthouse".to_string()],
        rooms,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_accommodations() -> Vec<Accommodation> {
    vec![
        accommodation(
            "Sea View Hotel",
            AccommodationType::Hotels,
            "Galle",
            vec![room("Deluxe", 3000), room("Suite", 7000)],
        ),
        accommodation(
            "Hilltop Resort",
            AccommodationType::Resorts,
            "Kandy",
            vec![room("Cottage", 5500)],
        ),
        accommodation(
            "City Homestay",
            AccommodationType::Homestays,
            "Colombo",
            vec![room("Private Room", 1500)],
        ),
        accommodation(
            "Beach Hotel",
            AccommodationType::Hotels,
            "Trincomalee",
            vec![room("Standard", 2500)],
        ),
    ]
}

#[test]
fn empty_query_keeps_everything() {
    let filtered = filter_inventory(sample_accommodations(), &[]);
    assert_eq!(filtered.len(), 4);
}

#[test]
fn term_matches_name_city_or_room_attributes() {
    let by_city = filter_inventory(sample_accommodations(), &["galle".to_string()]);
    assert_eq!(by_city.len(), 1);
    assert_eq!(by_city[0].name, "Sea View Hotel");

    // Room-level fields are searchable too
    let by_room_type = filter_inventory(sample_accommodations(), &["cottage".to_string()]);
    assert_eq!(by_room_type.len(), 1);
    assert_eq!(by_room_type[0].name, "Hilltop Resort");

    let by_amenity = filter_inventory(sample_accommodations(), &["air conditioning".to_string()]);
    assert_eq!(by_amenity.len(), 4);
}

#[test]
fn numeric_term_compares_against_cheapest_room() {
    // Sea View Hotel's cheapest room is 3000, so a 3000 ceiling keeps it
    // even though its Suite costs 7000.
    let affordable = filter_inventory(sample_accommodations(), &["3000".to_string()]);
    let names: Vec<_> = affordable.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Sea View Hotel", "City Homestay", "Beach Hotel"]);
}

#[test]
fn terms_narrow_with_and_semantics() {
    let terms = vec!["hotels".to_string(), "2500".to_string()];
    let matched = filter_inventory(sample_accommodations(), &terms);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Beach Hotel");
}

#[test]
fn grouping_buckets_by_category_in_first_seen_order() {
    let groups = group_by_category(sample_accommodations());
    let order: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(order, vec!["Hotels", "Resorts", "Homestays"]);
    assert_eq!(groups[0].items.len(), 2);
}

#[test]
fn activities_search_over_location_and_description() {
    let activity = SportAdventure {
        id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
        activity_id: "SWTEST1".to_string(),
        activity_type: SportAdventureType::WaterSports,
        name: "Reef Snorkeling".to_string(),
        description: "Guided snorkeling over the coral reef".to_string(),
        location: "Hikkaduwa".to_string(),
        price: Decimal::from(4000),
        minimum_age: 8,
        terms_and_conditions: vec![],
        image: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let hit = filter_inventory(vec![activity.clone()], &["coral".to_string()]);
    assert_eq!(hit.len(), 1);

    let miss = filter_inventory(vec![activity], &["kayak".to_string()]);
    assert!(miss.is_empty());
}

proptest! {
    #[test]
    fn filtering_is_order_independent(terms in prop::collection::vec("[a-z]{1,8}", 0..4)) {
        let forward: Vec<_> = filter_inventory(sample_accommodations(), &terms)
            .into_iter()
            .map(|a| a.name)
            .collect();
        let mut reversed = terms.clone();
        reversed.reverse();
        let backward: Vec<_> = filter_inventory(sample_accommodations(), &reversed)
            .into_iter()
            .map(|a| a.name)
            .collect();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn filtering_twice_changes_nothing(terms in prop::collection::vec("[a-z0-9]{1,6}", 0..4)) {
        let once: Vec<_> = filter_inventory(sample_accommodations(), &terms)
            .into_iter()
            .map(|a| a.name)
            .collect();
        let twice: Vec<_> = {
            let filtered = filter_inventory(sample_accommodations(), &terms);
            filter_inventory(filtered, &terms)
                .into_iter()
                .map(|a| a.name)
                .collect()
        };
        prop_assert_eq!(once, twice);
    }
}
