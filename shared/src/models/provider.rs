//! Service-provider models and lifecycle rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::Address;

/// Service category a provider is registered for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Accommodation,
    Transportation,
    SportAdventure,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Accommodation => "accommodation",
            ServiceType::Transportation => "transportation",
            ServiceType::SportAdventure => "sport_adventure",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceType::Accommodation => "Accommodation",
            ServiceType::Transportation => "Transportation",
            ServiceType::SportAdventure => "Sport Adventure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accommodation" => Some(ServiceType::Accommodation),
            "transportation" => Some(ServiceType::Transportation),
            "sport_adventure" => Some(ServiceType::SportAdventure),
            _ => None,
        }
    }
}

/// Application/approval status of a provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProviderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Pending => "pending",
            ProviderStatus::Approved => "approved",
            ProviderStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ProviderStatus::Pending),
            "approved" => Some(ProviderStatus::Approved),
            "rejected" => Some(ProviderStatus::Rejected),
            _ => None,
        }
    }

    /// Approved and Rejected are terminal; only Pending may move
    pub fn can_transition_to(&self, next: ProviderStatus) -> bool {
        matches!(self, ProviderStatus::Pending)
            && matches!(next, ProviderStatus::Approved | ProviderStatus::Rejected)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProviderStatus::Pending)
    }
}

/// Onboarding-fee payment status, orthogonal to approval
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Skipped,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "skipped" => Some(PaymentStatus::Skipped),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(self, PaymentStatus::Pending)
            && matches!(next, PaymentStatus::Paid | PaymentStatus::Skipped)
    }
}

/// How the provider prefers to be contacted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactMode {
    Phone,
    Email,
    Whatsapp,
}

impl ContactMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMode::Phone => "phone",
            ContactMode::Email => "email",
            ContactMode::Whatsapp => "whatsapp",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "phone" => Some(ContactMode::Phone),
            "email" => Some(ContactMode::Email),
            "whatsapp" => Some(ContactMode::Whatsapp),
            _ => None,
        }
    }
}

/// Stored filenames of the documents submitted with an application
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProviderDocuments {
    #[validate(length(min = 1, message = "business registration document is required"))]
    pub business_registration: String,
    #[validate(length(min = 1, message = "owner id proof is required"))]
    pub owner_id_proof: String,
    #[validate(length(min = 1, message = "tax certificate is required"))]
    pub tax_certificate: String,
    pub insurance_certificate: Option<String>,
}

/// A registered service provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub id: Uuid,
    pub email: String,
    pub business_name: String,
    pub owner_full_name: String,
    pub service_type: ServiceType,
    pub phone_number: String,
    pub address: Address,
    pub preferred_contact: ContactMode,
    pub status: ProviderStatus,
    pub payment_status: PaymentStatus,
    pub application_date: DateTime<Utc>,
    pub verified_by: Option<Uuid>,
    pub verification_date: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    pub documents: ProviderDocuments,
    pub service_photos: Vec<String>,
}

/// Input for submitting a provider application
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitApplicationInput {
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "business name is required"))]
    pub business_name: String,
    #[validate(length(min = 1, message = "owner full name is required"))]
    pub owner_full_name: String,
    pub service_type: ServiceType,
    #[validate(custom = "crate::validation::valid_mobile")]
    pub phone_number: String,
    pub address: Address,
    pub preferred_contact: ContactMode,
    #[validate]
    pub documents: ProviderDocuments,
    #[validate(length(min = 1, max = 5, message = "between 1 and 5 service photos are required"))]
    pub service_photos: Vec<String>,
    pub remarks: Option<String>,
}

/// The single gate consulted before any inventory-mutating operation:
/// the provider must be approved and registered for the requested category.
pub fn provider_can_manage(
    status: ProviderStatus,
    provider_type: ServiceType,
    requested: ServiceType,
) -> bool {
    status == ProviderStatus::Approved && provider_type == requested
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_either_terminal_state() {
        assert!(ProviderStatus::Pending.can_transition_to(ProviderStatus::Approved));
        assert!(ProviderStatus::Pending.can_transition_to(ProviderStatus::Rejected));
    }

    #[test]
    fn terminal_states_admit_no_transition() {
        for from in [ProviderStatus::Approved, ProviderStatus::Rejected] {
            for to in [
                ProviderStatus::Pending,
                ProviderStatus::Approved,
                ProviderStatus::Rejected,
            ] {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn payment_axis_moves_only_out_of_pending() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Paid));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Skipped));
        assert!(!PaymentStatus::Paid.can_transition_to(PaymentStatus::Skipped));
        assert!(!PaymentStatus::Skipped.can_transition_to(PaymentStatus::Paid));
    }

    #[test]
    fn manage_gate_requires_approval_and_matching_type() {
        assert!(provider_can_manage(
            ProviderStatus::Approved,
            ServiceType::Accommodation,
            ServiceType::Accommodation,
        ));
        assert!(!provider_can_manage(
            ProviderStatus::Pending,
            ServiceType::Accommodation,
            ServiceType::Accommodation,
        ));
        assert!(!provider_can_manage(
            ProviderStatus::Approved,
            ServiceType::Accommodation,
            ServiceType::Transportation,
        ));
    }

    #[test]
    fn application_input_validation() {
        let input = SubmitApplicationInput {
            email: "owner@seaview.lk".to_string(),
            business_name: "Sea View Hotel".to_string(),
            owner_full_name: "A. Perera".to_string(),
            service_type: ServiceType::Accommodation,
            phone_number: "9876543210".to_string(),
            address: Default::default(),
            preferred_contact: ContactMode::Email,
            documents: ProviderDocuments {
                business_registration: "br.pdf".to_string(),
                owner_id_proof: "id.pdf".to_string(),
                tax_certificate: "tax.pdf".to_string(),
                insurance_certificate: None,
            },
            service_photos: vec!["front.jpg".to_string()],
            remarks: None,
        };
        assert!(validator::Validate::validate(&input).is_ok());

        let mut bad_phone = input.clone();
        bad_phone.phone_number = "12345".to_string();
        assert!(validator::Validate::validate(&bad_phone).is_err());

        let mut too_many_photos = input.clone();
        too_many_photos.service_photos = vec!["p.jpg".to_string(); 6];
        assert!(validator::Validate::validate(&too_many_photos).is_err());

        let mut no_photos = input;
        no_photos.service_photos.clear();
        assert!(validator::Validate::validate(&no_photos).is_err());
    }
}
