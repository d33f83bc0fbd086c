//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Postal address fields shared by provider applications and listings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Address {
    /// Single-line rendering used for display and free-text search
    pub fn display(&self) -> String {
        [&self.street, &self.city, &self.state, &self.postal_code]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Destination category for uploaded files
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadCategory {
    Image,
    Document,
}

impl UploadCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::Image => "images",
            UploadCategory::Document => "documents",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "images" | "image" => Some(UploadCategory::Image),
            "documents" | "document" => Some(UploadCategory::Document),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_display_skips_empty_parts() {
        let address = Address {
            street: "12 Beach Road".to_string(),
            city: "Galle".to_string(),
            state: String::new(),
            postal_code: "80000".to_string(),
        };
        assert_eq!(address.display(), "12 Beach Road, Galle, 80000");
    }

    #[test]
    fn upload_category_round_trips() {
        assert_eq!(UploadCategory::parse("images"), Some(UploadCategory::Image));
        assert_eq!(
            UploadCategory::parse("document"),
            Some(UploadCategory::Document)
        );
        assert_eq!(UploadCategory::parse("video"), None);
    }
}
