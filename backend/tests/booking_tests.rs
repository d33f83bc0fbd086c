//! Booking engine tests
//!
//! Price computation, the reservation state machine, participant checks,
//! and an end-to-end walk through the pure parts of the marketplace flow.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use validator::Validate;

use shared::pricing::{compute_total, nights_between, PricingError};
use shared::{
    provider_can_manage, validate_participants, AccommodationType, BookingDecision, BookingDetails,
    BookingKind, BookingStatus, CreateAccommodationBookingInput, CustomerContact, Participant,
    ProviderStatus, Room, ServiceType,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn customer() -> CustomerContact {
    CustomerContact {
        name: "T. Jayasuriya".to_string(),
        mobile: "0719876543".to_string(),
        email: "tj@example.com".to_string(),
    }
}

// ============================================================================
// Price computation
// ============================================================================

#[test]
fn two_nights_at_3000_totals_6000() {
    let nights = nights_between(date(2025, 4, 10), date(2025, 4, 12)).unwrap();
    assert_eq!(nights, 2);
    assert_eq!(
        compute_total(Decimal::from(3000), nights),
        Ok(Decimal::from(6000))
    );
}

#[test]
fn same_day_checkout_is_rejected() {
    assert_eq!(
        nights_between(date(2025, 4, 10), date(2025, 4, 10)),
        Err(PricingError::InvalidDateRange)
    );
}

#[test]
fn transportation_charges_per_passenger() {
    // Day rate 4500, three passengers
    assert_eq!(
        compute_total(Decimal::from(4500), 3),
        Ok(Decimal::from(13500))
    );
}

proptest! {
    #[test]
    fn valid_ranges_always_price_positively(
        start_offset in 0i64..3000,
        nights in 1i64..365,
        price in 1i64..100_000,
    ) {
        let check_in = date(2025, 1, 1) + chrono::Duration::days(start_offset);
        let check_out = check_in + chrono::Duration::days(nights);

        let computed = nights_between(check_in, check_out).unwrap();
        prop_assert_eq!(computed, nights);

        let total = compute_total(Decimal::from(price), computed).unwrap();
        prop_assert_eq!(total, Decimal::from(price) * Decimal::from(nights));
        prop_assert!(total > Decimal::ZERO);
    }

    #[test]
    fn inverted_or_equal_ranges_never_price(
        start_offset in 0i64..3000,
        backwards in 0i64..365,
    ) {
        let check_in = date(2025, 1, 1) + chrono::Duration::days(start_offset);
        let check_out = check_in - chrono::Duration::days(backwards);
        prop_assert!(nights_between(check_in, check_out).is_err());
    }
}

// ============================================================================
// Reservation state machine
// ============================================================================

#[test]
fn a_booking_is_decided_exactly_once() {
    assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Approved));
    assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Rejected));

    for decided in [BookingStatus::Approved, BookingStatus::Rejected] {
        assert!(decided.is_terminal());
        for next in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Rejected,
        ] {
            assert!(!decided.can_transition_to(next));
        }
    }
}

#[test]
fn decisions_map_onto_terminal_statuses() {
    assert_eq!(BookingDecision::Approved.as_status(), BookingStatus::Approved);
    assert_eq!(BookingDecision::Rejected.as_status(), BookingStatus::Rejected);
    assert!(BookingDecision::Approved.as_status().is_terminal());
}

// ============================================================================
// Participant checks
// ============================================================================

#[test]
fn headcount_and_details_must_agree() {
    let group = vec![
        Participant {
            name: "Asha".to_string(),
            age: 24,
        },
        Participant {
            name: "Ravi".to_string(),
            age: 19,
        },
    ];
    assert!(validate_participants(&group, 2, 16).is_ok());
    assert!(validate_participants(&group, 3, 16).is_err());
}

#[test]
fn minimum_age_is_inclusive_and_named() {
    let group = vec![Participant {
        name: "Ravi".to_string(),
        age: 16,
    }];
    assert!(validate_participants(&group, 1, 16).is_ok());

    let underage = vec![Participant {
        name: "Ravi".to_string(),
        age: 15,
    }];
    let error = validate_participants(&underage, 1, 16).unwrap_err();
    assert!(error.contains("Ravi"));
    assert!(error.contains("15"));
}

// ============================================================================
// Booking input validation
// ============================================================================

#[test]
fn accommodation_booking_input_checks_contact_and_guests() {
    let input = CreateAccommodationBookingInput {
        accommodation_id: "H4F2A1".to_string(),
        room_number: "101".to_string(),
        customer: customer(),
        check_in: date(2025, 4, 10),
        check_out: date(2025, 4, 12),
        guests: 2,
    };
    assert!(input.validate().is_ok());

    let mut no_guests = input.clone();
    no_guests.guests = 0;
    assert!(no_guests.validate().is_err());

    let mut bad_mobile = input;
    bad_mobile.customer.mobile = "123".to_string();
    assert!(bad_mobile.validate().is_err());
}

// ============================================================================
// End-to-end pure lifecycle
// ============================================================================

#[test]
fn marketplace_flow_from_application_to_decided_booking() {
    // Application arrives pending; the gate stays shut.
    let mut status = ProviderStatus::Pending;
    assert!(!provider_can_manage(
        status,
        ServiceType::Accommodation,
        ServiceType::Accommodation
    ));

    // Admin approves; the gate opens for the registered category only.
    assert!(status.can_transition_to(ProviderStatus::Approved));
    status = ProviderStatus::Approved;
    assert!(provider_can_manage(
        status,
        ServiceType::Accommodation,
        ServiceType::Accommodation
    ));
    assert!(!provider_can_manage(
        status,
        ServiceType::Accommodation,
        ServiceType::Transportation
    ));

    // Provider lists a hotel room valid for its category.
    let room = Room {
        room_number: "204".to_string(),
        room_type: "Deluxe".to_string(),
        price_per_night: Decimal::from(3000),
        number_of_beds: 2,
        facilities: vec!["WiFi".to_string()],
        amenities: vec![],
        description: String::new(),
        image: None,
    };
    assert!(room.validate_for(AccommodationType::Hotels).is_ok());

    // Customer books two nights; the snapshot totals 6000.
    let nights = nights_between(date(2025, 4, 10), date(2025, 4, 12)).unwrap();
    let total = compute_total(room.price_per_night, nights).unwrap();
    assert_eq!(total, Decimal::from(6000));

    let details = BookingDetails::Accommodation {
        room_number: room.room_number.clone(),
        room_type: room.room_type.clone(),
        check_in: date(2025, 4, 10),
        check_out: date(2025, 4, 12),
        nights,
        guests: 2,
    };
    assert_eq!(details.kind(), BookingKind::Accommodation);

    // Provider approves; a second decision has no legal transition.
    let mut booking_status = BookingStatus::Pending;
    assert!(booking_status.can_transition_to(BookingDecision::Approved.as_status()));
    booking_status = BookingDecision::Approved.as_status();
    assert!(!booking_status.can_transition_to(BookingDecision::Rejected.as_status()));
}
