//! Transportation unit models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search::Searchable;

/// Vehicle categories offered on the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    Car,
    Bus,
    Train,
    Flight,
    Boat,
    Other,
}

impl TransportType {
    pub const ALL: [TransportType; 6] = [
        TransportType::Car,
        TransportType::Bus,
        TransportType::Train,
        TransportType::Flight,
        TransportType::Boat,
        TransportType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Car => "car",
            TransportType::Bus => "bus",
            TransportType::Train => "train",
            TransportType::Flight => "flight",
            TransportType::Boat => "boat",
            TransportType::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TransportType::Car => "Car",
            TransportType::Bus => "Bus",
            TransportType::Train => "Train",
            TransportType::Flight => "Flight",
            TransportType::Boat => "Boat",
            TransportType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "car" => Some(TransportType::Car),
            "bus" => Some(TransportType::Bus),
            "train" => Some(TransportType::Train),
            "flight" => Some(TransportType::Flight),
            "boat" => Some(TransportType::Boat),
            "other" => Some(TransportType::Other),
            _ => None,
        }
    }

    pub fn id_prefix(&self) -> &'static str {
        match self {
            TransportType::Car => "TC",
            TransportType::Bus => "TB",
            TransportType::Train => "TT",
            TransportType::Flight => "TF",
            TransportType::Boat => "TO",
            TransportType::Other => "TX",
        }
    }
}

/// A bookable transportation unit owned by one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transportation {
    pub id: Uuid,
    pub provider_id: Uuid,
    /// Generated display id, unique across transportation units (e.g. `TC09B3`)
    pub transport_id: String,
    pub transport_type: TransportType,
    pub driver_name: String,
    pub model: String,
    pub price_per_day: Decimal,
    pub features: Vec<String>,
    pub terms_and_conditions: String,
    pub permit_number: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Transportation {
    fn search_texts(&self) -> Vec<String> {
        let mut texts = vec![
            self.model.clone(),
            self.driver_name.clone(),
            self.transport_type.display_name().to_string(),
        ];
        texts.extend(self.features.iter().cloned());
        texts
    }

    fn search_price(&self) -> Option<Decimal> {
        Some(self.price_per_day)
    }

    fn category_key(&self) -> String {
        self.transport_type.display_name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_match_the_category_table() {
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
}
