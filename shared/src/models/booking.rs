//! Booking models and the shared reservation state machine
//!
//! The three booking kinds (accommodation room, transportation unit,
//! sport-adventure activity) share one record shape and one state machine;
//! kind-specific fields live in the tagged [`BookingDetails`] union.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a reservation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "rejected" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }

    /// Approved and Rejected are terminal; a decided booking never moves again
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(self, BookingStatus::Pending)
            && matches!(next, BookingStatus::Approved | BookingStatus::Rejected)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }
}

/// The provider's decision on a pending booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingDecision {
    Approved,
    Rejected,
}

impl BookingDecision {
    pub fn as_status(&self) -> BookingStatus {
        match self {
            BookingDecision::Approved => BookingStatus::Approved,
            BookingDecision::Rejected => BookingStatus::Rejected,
        }
    }
}

/// Which inventory collection a booking refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    Accommodation,
    Transportation,
    SportAdventure,
}

impl BookingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingKind::Accommodation => "accommodation",
            BookingKind::Transportation => "transportation",
            BookingKind::SportAdventure => "sport_adventure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accommodation" => Some(BookingKind::Accommodation),
            "transportation" => Some(BookingKind::Transportation),
            "sport_adventure" => Some(BookingKind::SportAdventure),
            _ => None,
        }
    }
}

/// One participant of a sport-adventure booking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub age: i32,
}

/// Kind-specific booking fields, snapshotted at creation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingDetails {
    Accommodation {
        room_number: String,
        room_type: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
        nights: i64,
        guests: i32,
    },
    Transportation {
        travel_date: NaiveDate,
        passengers: i32,
    },
    SportAdventure {
        activity_date: NaiveDate,
        participants: Vec<Participant>,
    },
}

impl BookingDetails {
    pub fn kind(&self) -> BookingKind {
        match self {
            BookingDetails::Accommodation { .. } => BookingKind::Accommodation,
            BookingDetails::Transportation { .. } => BookingKind::Transportation,
            BookingDetails::SportAdventure { .. } => BookingKind::SportAdventure,
        }
    }
}

/// A reservation against one inventory unit.
///
/// `unit_name` and `unit_price` are copied from the inventory record when
/// the booking is created; later price edits by the provider never alter
/// historical bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub provider_id: Uuid,
    /// Display id of the booked unit (`H...`, `TC...`, `SH...`)
    pub unit_id: String,
    pub unit_name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub total_price: Decimal,
    pub customer_name: String,
    pub customer_mobile: String,
    pub customer_email: String,
    pub status: BookingStatus,
    pub booking_datetime: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub details: BookingDetails,
}

/// Customer contact fields common to every booking kind
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CustomerContact {
    #[validate(length(min = 1, message = "customer name is required"))]
    pub name: String,
    #[validate(custom = "crate::validation::valid_mobile")]
    pub mobile: String,
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
}

/// Input for booking a specific room of an accommodation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAccommodationBookingInput {
    pub accommodation_id: String,
    pub room_number: String,
    #[validate]
    pub customer: CustomerContact,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, message = "at least one guest is required"))]
    pub guests: i32,
}

/// Input for booking a transportation unit for a single travel day
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransportationBookingInput {
    pub transport_id: String,
    #[validate]
    pub customer: CustomerContact,
    pub travel_date: NaiveDate,
    #[validate(range(min = 1, message = "at least one passenger is required"))]
    pub passengers: i32,
}

/// Input for booking a sport-adventure activity
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSportAdventureBookingInput {
    pub activity_id: String,
    #[validate]
    pub customer: CustomerContact,
    pub activity_date: NaiveDate,
    #[validate(range(min = 1, message = "at least one participant is required"))]
    pub total_participants: i32,
    pub participants: Vec<Participant>,
}

/// Check the participant list of a sport-adventure booking against the
/// declared headcount and the activity's minimum age. Errors name the
/// offending participant so the caller can correct the input.
pub fn validate_participants(
    participants: &[Participant],
    total_participants: i32,
    minimum_age: i32,
) -> Result<(), String> {
    if participants.len() as i32 != total_participants {
        return Err(format!(
            "{} participant details provided but total_participants is {}",
            participants.len(),
            total_participants
        ));
    }
    for (index, participant) in participants.iter().enumerate() {
        if participant.name.trim().is_empty() {
            return Err(format!("participant {} is missing a name", index + 1));
        }
        if !crate::pricing::meets_minimum_age(participant.age, minimum_age) {
            return Err(format!(
                "participant '{}' is {} years old; the minimum age is {}",
                participant.name, participant.age, minimum_age
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_the_only_live_state() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Approved));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Rejected));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn decided_bookings_never_move_again() {
        for from in [BookingStatus::Approved, BookingStatus::Rejected] {
            assert!(from.is_terminal());
            for to in [
                BookingStatus::Pending,
                BookingStatus::Approved,
                BookingStatus::Rejected,
            ] {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn participant_count_must_match_headcount() {
        let participants = vec![Participant {
            name: "Asha".to_string(),
            age: 20,
        }];
        assert!(validate_participants(&participants, 2, 0).is_err());
        assert!(validate_participants(&participants, 1, 0).is_ok());
    }

    #[test]
    fn underage_participant_is_named_in_the_error() {
        let participants = vec![
            Participant {
                name: "Asha".to_string(),
                age: 15,
            },
            Participant {
                name: "Ravi".to_string(),
                age: 10,
            },
        ];
        let error = validate_participants(&participants, 2, 12).unwrap_err();
        assert!(error.contains("Ravi"));
    }

    #[test]
    fn minimum_age_boundary_is_inclusive() {
        let participants = vec![Participant {
            name: "Asha".to_string(),
            age: 12,
        }];
        assert!(validate_participants(&participants, 1, 12).is_ok());
    }

    #[test]
    fn contact_validation_rejects_bad_mobile_and_email() {
        let good = CustomerContact {
            name: "Guest".to_string(),
            mobile: "9876543210".to_string(),
            email: "guest@example.com".to_string(),
        };
        assert!(good.validate().is_ok());

        let mut bad_mobile = good.clone();
        bad_mobile.mobile = "98765".to_string();
        assert!(bad_mobile.validate().is_err());

        let mut bad_email = good;
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn details_report_their_kind() {
        let details = BookingDetails::Transportation {
            travel_date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            passengers: 3,
        };
        assert_eq!(details.kind(), BookingKind::Transportation);
    }
}
