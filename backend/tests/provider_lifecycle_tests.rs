//! Provider onboarding lifecycle tests
//!
//! Covers the application state machine, the orthogonal payment axis, the
//! inventory management gate, and application input validation.

use proptest::prelude::*;
use validator::Validate;

use shared::{
    provider_can_manage, ContactMode, PaymentStatus, ProviderDocuments, ProviderStatus,
    ServiceType, SubmitApplicationInput,
};

fn all_statuses() -> [ProviderStatus; 3] {
    [
        ProviderStatus::Pending,
        ProviderStatus::Approved,
        ProviderStatus::Rejected,
    ]
}

fn all_service_types() -> [ServiceType; 3] {
    [
        ServiceType::Accommodation,
        ServiceType::Transportation,
        ServiceType::SportAdventure,
    ]
}

fn valid_application() -> SubmitApplicationInput {
    SubmitApplicationInput {
        email: "owner@lagoonstays.lk".to_string(),
        business_name: "Lagoon Stays".to_string(),
        owner_full_name: "N. Fernando".to_string(),
        service_type: ServiceType::Accommodation,
        phone_number: "0771234567".to_string(),
        address: Default::default(),
        preferred_contact: ContactMode::Email,
        documents: ProviderDocuments {
            business_registration: "registration.pdf".to_string(),
            owner_id_proof: "nic.pdf".to_string(),
            tax_certificate: "tax.pdf".to_string(),
            insurance_certificate: None,
        },
        service_photos: vec!["exterior.jpg".to_string(), "lobby.jpg".to_string()],
        remarks: None,
    }
}

// ============================================================================
// Application state machine
// ============================================================================

#[test]
fn only_pending_applications_can_be_decided() {
    assert!(ProviderStatus::Pending.can_transition_to(ProviderStatus::Approved));
    assert!(ProviderStatus::Pending.can_transition_to(ProviderStatus::Rejected));
    assert!(!ProviderStatus::Pending.can_transition_to(ProviderStatus::Pending));

    for terminal in [ProviderStatus::Approved, ProviderStatus::Rejected] {
        assert!(terminal.is_terminal());
        for next in all_statuses() {
            assert!(!terminal.can_transition_to(next));
        }
    }
}

#[test]
fn status_round_trips_through_storage_representation() {
    for status in all_statuses() {
        assert_eq!(ProviderStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(ProviderStatus::parse("cancelled"), None);
}

// ============================================================================
// Payment axis
// ============================================================================

#[test]
fn payment_outcome_is_recorded_once() {
    assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Paid));
    assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Skipped));

    for settled in [PaymentStatus::Paid, PaymentStatus::Skipped] {
        for next in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Skipped,
        ] {
            assert!(!settled.can_transition_to(next));
        }
    }
}

#[test]
fn payment_never_blocks_the_management_gate() {
    // The gate consults approval status and category only; payment is an
    // independent axis.
    assert!(provider_can_manage(
        ProviderStatus::Approved,
        ServiceType::Transportation,
        ServiceType::Transportation,
    ));
}

// ============================================================================
// Management gate
// ============================================================================

proptest! {
    #[test]
    fn gate_opens_exactly_for_approved_matching_category(
        status_idx in 0usize..3,
        provider_idx in 0usize..3,
        requested_idx in 0usize..3,
    ) {
        let status = all_statuses()[status_idx];
        let provider_type = all_service_types()[provider_idx];
        let requested = all_service_types()[requested_idx];

        let expected = status == ProviderStatus::Approved && provider_type == requested;
        prop_assert_eq!(
            provider_can_manage(status, provider_type, requested),
            expected
        );
    }
}

// ============================================================================
// Application validation
// ============================================================================

#[test]
fn complete_application_passes_validation() {
    assert!(valid_application().validate().is_ok());
}

#[test]
fn mobile_number_must_be_ten_digits() {
    let mut short = valid_application();
    short.phone_number = "07712345".to_string();
    assert!(short.validate().is_err());

    let mut alpha = valid_application();
    alpha.phone_number = "07712345ab".to_string();
    assert!(alpha.validate().is_err());
}

#[test]
fn required_documents_cannot_be_empty() {
    let mut missing = valid_application();
    missing.documents.tax_certificate = String::new();
    assert!(missing.validate().is_err());

    // Insurance stays optional
    let mut no_insurance = valid_application();
    no_insurance.documents.insurance_certificate = None;
    assert!(no_insurance.validate().is_ok());
}

#[test]
fn photo_count_is_bounded() {
    let mut none = valid_application();
    none.service_photos.clear();
    assert!(none.validate().is_err());

    let mut too_many = valid_application();
    too_many.service_photos = vec!["p.jpg".to_string(); 6];
    assert!(too_many.validate().is_err());

    let mut five = valid_application();
    five.service_photos = vec!["p.jpg".to_string(); 5];
    assert!(five.validate().is_ok());
}

proptest! {
    #[test]
    fn malformed_emails_are_rejected(local in "[a-z]{1,10}") {
        let mut input = valid_application();
        input.email = local; // no @-part
        prop_assert!(input.validate().is_err());
    }
}
