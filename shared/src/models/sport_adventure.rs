//! Sport-adventure activity models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search::Searchable;

/// Activity categories offered on the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SportAdventureType {
    Hiking,
    Trekking,
    Climbing,
    WaterSports,
    AdventureSports,
    Other,
}

impl SportAdventureType {
    pub const ALL: [SportAdventureType; 6] = [
        SportAdventureType::Hiking,
        SportAdventureType::Trekking,
        SportAdventureType::Climbing,
        SportAdventureType::WaterSports,
        SportAdventureType::AdventureSports,
        SportAdventureType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SportAdventureType::Hiking => "hiking",
            SportAdventureType::Trekking => "trekking",
            SportAdventureType::Climbing => "climbing",
            SportAdventureType::WaterSports => "water_sports",
            SportAdventureType::AdventureSports => "adventure_sports",
            SportAdventureType::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SportAdventureType::Hiking => "Hiking",
            SportAdventureType::Trekking => "Trekking",
            SportAdventureType::Climbing => "Climbing",
            SportAdventureType::WaterSports => "Water Sports",
            SportAdventureType::AdventureSports => "Adventure Sports",
            SportAdventureType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hiking" => Some(SportAdventureType::Hiking),
            "trekking" => Some(SportAdventureType::Trekking),
            "climbing" => Some(SportAdventureType::Climbing),
            "water_sports" => Some(SportAdventureType::WaterSports),
            "adventure_sports" => Some(SportAdventureType::AdventureSports),
            "other" => Some(SportAdventureType::Other),
            _ => None,
        }
    }

    pub fn id_prefix(&self) -> &'static str {
        match self {
            SportAdventureType::Hiking => "SH",
            SportAdventureType::Trekking => "ST",
            SportAdventureType::Climbing => "SC",
            SportAdventureType::WaterSports => "SW",
            SportAdventureType::AdventureSports => "SA",
            SportAdventureType::Other => "SX",
        }
    }
}

/// A bookable activity owned by one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportAdventure {
    pub id: Uuid,
    pub provider_id: Uuid,
    /// Generated display id, unique across activities (e.g. `SH77C2`)
    pub activity_id: String,
    pub activity_type: SportAdventureType,
    pub name: String,
    pub description: String,
    pub location: String,
    pub price: Decimal,
    pub minimum_age: i32,
    pub terms_and_conditions: Vec<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for SportAdventure {
    fn search_texts(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.activity_type.display_name().to_string(),
            self.location.clone(),
            self.description.clone(),
        ]
    }

    fn search_price(&self) -> Option<Decimal> {
        Some(self.price)
    }

    fn category_key(&self) -> String {
        self.activity_type.display_name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_match_the_category_table() {
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
}
