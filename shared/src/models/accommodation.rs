//! Accommodation and room models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search::Searchable;
use crate::types::Address;

/// Fixed accommodation categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationType {
    Hotels,
    Resorts,
    Homestays,
    Villas,
    Apartments,
    Guesthouses,
}

impl AccommodationType {
    pub const ALL: [AccommodationType; 6] = [
        AccommodationType::Hotels,
        AccommodationType::Resorts,
        AccommodationType::Homestays,
        AccommodationType::Villas,
        AccommodationType::Apartments,
        AccommodationType::Guesthouses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccommodationType::Hotels => "hotels",
            AccommodationType::Resorts => "resorts",
            AccommodationType::Homestays => "homestays",
            AccommodationType::Villas => "villas",
            AccommodationType::Apartments => "apartments",
            AccommodationType::Guesthouses => "guesthouses",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AccommodationType::Hotels => "Hotels",
            AccommodationType::Resorts => "Resorts",
            AccommodationType::Homestays => "Homestays",
            AccommodationType::Villas => "Villas",
            AccommodationType::Apartments => "Apartments",
            AccommodationType::Guesthouses => "Guesthouses",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hotels" => Some(AccommodationType::Hotels),
            "resorts" => Some(AccommodationType::Resorts),
            "homestays" => Some(AccommodationType::Homestays),
            "villas" => Some(AccommodationType::Villas),
            "apartments" => Some(AccommodationType::Apartments),
            "guesthouses" => Some(AccommodationType::Guesthouses),
            _ => None,
        }
    }

    /// Prefix of generated display ids for this category
    pub fn id_prefix(&self) -> &'static str {
        match self {
            AccommodationType::Hotels => "H",
            AccommodationType::Resorts => "R",
            AccommodationType::Homestays => "M",
            AccommodationType::Villas => "V",
            AccommodationType::Apartments => "A",
            AccommodationType::Guesthouses => "G",
        }
    }

    /// Room types a listing of this category may offer
    pub fn allowed_room_types(&self) -> &'static [&'static str] {
        match self {
            AccommodationType::Hotels => &[
                "Standard",
                "Deluxe",
                "Suite",
                "Executive Suite",
                "Family Room",
                "Presidential Suite",
            ],
            AccommodationType::Resorts => &[
                "Cottage",
                "Bungalow",
                "Luxury Suite",
                "Private Villa",
                "Tent",
                "Chalet",
            ],
            AccommodationType::Homestays => &[
                "Private Room",
                "Entire Home/Apartment",
                "Shared Room",
                "Studio",
                "Basic Room",
                "Family Suite",
            ],
            AccommodationType::Villas => &[
                "Entire Villa",
                "With Private Pool",
                "Multiple Bedrooms",
                "Sea-facing",
                "Garden View",
                "Luxury Villa",
                "Budget Villa",
            ],
            AccommodationType::Apartments => {
                &["Studio", "1BR", "2BR", "3BR", "Penthouse", "Serviced"]
            }
            AccommodationType::Guesthouses => {
                &["Single", "Double", "Twin", "Triple", "Dorm", "En-suite"]
            }
        }
    }
}

/// A bookable room inside an accommodation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub room_number: String,
    pub room_type: String,
    pub price_per_night: Decimal,
    pub number_of_beds: i32,
    pub facilities: Vec<String>,
    pub amenities: Vec<String>,
    pub description: String,
    pub image: Option<String>,
}

impl Room {
    /// Validate this room against its parent's accommodation type
    pub fn validate_for(&self, accommodation_type: AccommodationType) -> Result<(), String> {
        if self.room_number.trim().is_empty() {
            return Err("room number is required".to_string());
        }
        let allowed = accommodation_type.allowed_room_types();
        if !allowed.contains(&self.room_type.as_str()) {
            return Err(format!(
                "room type '{}' is not allowed for {}",
                self.room_type,
                accommodation_type.display_name()
            ));
        }
        if self.price_per_night <= Decimal::ZERO {
            return Err("price per night must be greater than zero".to_string());
        }
        if self.number_of_beds < 1 {
            return Err("a room must have at least one bed".to_string());
        }
        Ok(())
    }
}

/// An accommodation listing owned by one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accommodation {
    pub id: Uuid,
    pub provider_id: Uuid,
    /// Generated display id, unique across accommodations (e.g. `H4F2A1`)
    pub accommodation_id: String,
    pub accommodation_type: AccommodationType,
    pub name: String,
    pub owner_name: String,
    pub address: Address,
    pub main_image: Option<String>,
    pub terms_and_conditions: String,
    pub nearby_locations: Vec<String>,
    pub rooms: Vec<Room>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Accommodation {
    /// Cheapest nightly rate across rooms, used by numeric search terms
    pub fn min_room_price(&self) -> Option<Decimal> {
        self.rooms.iter().map(|room| room.price_per_night).min()
    }

    pub fn find_room(&self, room_number: &str) -> Option<&Room> {
        self.rooms
            .iter()
            .find(|room| room.room_number == room_number)
    }
}

impl Searchable for Accommodation {
    fn search_texts(&self) -> Vec<String> {
        let mut texts = vec![
            self.name.clone(),
            self.accommodation_type.display_name().to_string(),
            self.address.display(),
        ];
        texts.extend(self.nearby_locations.iter().cloned());
        for room in &self.rooms {
            texts.push(room.room_type.clone());
            texts.extend(room.facilities.iter().cloned());
            texts.extend(room.amenities.iter().cloned());
        }
        texts
    }

    fn search_price(&self) -> Option<Decimal> {
        self.min_room_price()
    }

    fn category_key(&self) -> String {
        self.accommodation_type.display_name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(room_type: &str) -> Room {
        Room {
            room_number: "101".to_string(),
            room_type: room_type.to_string(),
            price_per_night: Decimal::from(3000),
            number_of_beds: 2,
            facilities: vec!["WiFi".to_string()],
            amenities: vec!["Air Conditioning".to_string()],
            description: String::new(),
            image: None,
        }
    }

    #[test]
    fn every_category_has_a_distinct_prefix() {
        let prefixes: Vec<_> = AccommodationType::ALL.iter().map(|t| t.id_prefix()).collect();
        let mut deduped = prefixes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(prefixes.len(), deduped.len());
        assert_eq!(AccommodationType::Hotels.id_prefix(), "H");
        assert_eq!(AccommodationType::Homestays.id_prefix(), "M");
    }

    #[test]
    fn room_type_must_match_parent_category() {
        assert!(room("Suite").validate_for(AccommodationType::Hotels).is_ok());
        // "Suite" belongs to Hotels, not Villas
        assert!(room("Suite").validate_for(AccommodationType::Villas).is_err());
        assert!(room("Entire Villa")
            .validate_for(AccommodationType::Villas)
            .is_ok());
    }

    #[test]
    fn room_price_and_beds_are_validated() {
        let mut free = room("Standard");
        free.price_per_night = Decimal::ZERO;
        assert!(free.validate_for(AccommodationType::Hotels).is_err());

        let mut bedless = room("Standard");
        bedless.number_of_beds = 0;
        assert!(bedless.validate_for(AccommodationType::Hotels).is_err());
    }

    #[test]
    fn min_room_price_picks_cheapest() {
        let mut cheap = room("Standard");
        cheap.price_per_night = Decimal::from(1200);
        let accommodation = Accommodation {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            accommodation_id: "H123456".to_string(),
            accommodation_type: AccommodationType::Hotels,
            name: "Sea View Hotel".to_string(),
            owner_name: "A. Perera".to_string(),
            address: Default::default(),
            main_image: None,
            terms_and_conditions: String::new(),
            nearby_locations: vec![],
            rooms: vec![room("Deluxe"), cheap],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(accommodation.min_room_price(), Some(Decimal::from(1200)));
    }
}
