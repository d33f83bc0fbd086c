//! Booking engine
//!
//! Creation snapshots the unit's name and price into the booking row and
//! computes the total up front. Decisions run as guarded updates so a
//! booking is decided exactly once.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::pricing::{compute_total, nights_between};
use shared::{
    validate_participants, Booking, BookingDecision, BookingDetails, BookingStatus,
    CreateAccommodationBookingInput, CreateSportAdventureBookingInput,
    CreateTransportationBookingInput, CustomerContact,
};

use super::{AccommodationService, SportAdventureService, TransportationService};

/// Booking engine service
#[derive(Clone)]
pub struct BookingService {
    db: PgPool,
}

const BOOKING_COLUMNS: &str = "id, provider_id, unit_id, unit_name, unit_price, quantity, \
     total_price, customer_name, customer_mobile, customer_email, status, \
     booking_datetime, approved_at, rejected_at, details";

#[derive(Debug, FromRow)]
struct BookingRow {
    id: Uuid,
    provider_id: Uuid,
    unit_id: String,
    unit_name: String,
    unit_price: Decimal,
    quantity: i64,
    total_price: Decimal,
    customer_name: String,
    customer_mobile: String,
    customer_email: String,
    status: String,
    booking_datetime: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    details: Json<BookingDetails>,
}

impl BookingRow {
    fn into_model(self) -> AppResult<Booking> {
        let status = BookingStatus::parse(&self.status)
            .ok_or_else(|| AppError::Internal(format!("unknown booking status {}", self.status)))?;

        Ok(Booking {
            id: self.id,
            provider_id: self.provider_id,
            unit_id: self.unit_id,
            unit_name: self.unit_name,
            unit_price: self.unit_price,
            quantity: self.quantity,
            total_price: self.total_price,
            customer_name: self.customer_name,
            customer_mobile: self.customer_mobile,
            customer_email: self.customer_email,
            status,
            booking_datetime: self.booking_datetime,
            approved_at: self.approved_at,
            rejected_at: self.rejected_at,
            details: self.details.0,
        })
    }
}

/// What a creation call stores, assembled before the insert
struct NewBooking {
    provider_id: Uuid,
    unit_id: String,
    unit_name: String,
    unit_price: Decimal,
    quantity: i64,
    total_price: Decimal,
    customer: CustomerContact,
    details: BookingDetails,
}

impl BookingService {
    /// Create a new BookingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Book a specific room of an accommodation for a date range
    pub async fn create_accommodation_booking(
        &self,
        input: CreateAccommodationBookingInput,
    ) -> AppResult<Booking> {
        input.validate()?;

        let accommodation = AccommodationService::new(self.db.clone())
            .get_by_display_id(&input.accommodation_id)
            .await?;
        let room = accommodation
            .find_room(&input.room_number)
            .ok_or_else(|| AppError::NotFound("Room".to_string()))?;

        let nights = nights_between(input.check_in, input.check_out)?;
        let total_price = compute_total(room.price_per_night, nights)?;

        self.insert(NewBooking {
            provider_id: accommodation.provider_id,
            unit_id: accommodation.accommodation_id.clone(),
            unit_name: accommodation.name.clone(),
            unit_price: room.price_per_night,
            quantity: nights,
            total_price,
            customer: input.customer,
            details: BookingDetails::Accommodation {
                room_number: room.room_number.clone(),
                room_type: room.room_type.clone(),
                check_in: input.check_in,
                check_out: input.check_out,
                nights,
                guests: input.guests,
            },
        })
        .await
    }

    /// Book a transportation unit. The day rate is charged per passenger.
    pub async fn create_transportation_booking(
        &self,
        input: CreateTransportationBookingInput,
    ) -> AppResult<Booking> {
        input.validate()?;

        let transportation = TransportationService::new(self.db.clone())
            .get_by_display_id(&input.transport_id)
            .await?;

        let passengers = i64::from(input.passengers);
        let total_price = compute_total(transportation.price_per_day, passengers)?;

        self.insert(NewBooking {
            provider_id: transportation.provider_id,
            unit_id: transportation.transport_id.clone(),
            unit_name: transportation.model.clone(),
            unit_price: transportation.price_per_day,
            quantity: passengers,
            total_price,
            customer: input.customer,
            details: BookingDetails::Transportation {
                travel_date: input.travel_date,
                passengers: input.passengers,
            },
        })
        .await
    }

    /// Book a sport-adventure activity for a group of participants
    pub async fn create_sport_adventure_booking(
        &self,
        input: CreateSportAdventureBookingInput,
    ) -> AppResult<Booking> {
        input.validate()?;

        let activity = SportAdventureService::new(self.db.clone())
            .get_by_display_id(&input.activity_id)
            .await?;

        validate_participants(
            &input.participants,
            input.total_participants,
            activity.minimum_age,
        )
        .map_err(|message| AppError::Validation {
            field: "participants".to_string(),
            message,
        })?;

        let participants = i64::from(input.total_participants);
        let total_price = compute_total(activity.price, participants)?;

        self.insert(NewBooking {
            provider_id: activity.provider_id,
            unit_id: activity.activity_id.clone(),
            unit_name: activity.name.clone(),
            unit_price: activity.price,
            quantity: participants,
            total_price,
            customer: input.customer,
            details: BookingDetails::SportAdventure {
                activity_date: input.activity_date,
                participants: input.participants,
            },
        })
        .await
    }

    /// Get one booking by id
    pub async fn get_booking(&self, booking_id: Uuid) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1",
        ))
        .bind(booking_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking".to_string()))?;

        row.into_model()
    }

    /// Incoming bookings of one provider, newest first
    pub async fn list_for_provider(
        &self,
        provider_id: Uuid,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings \
                     WHERE provider_id = $1 AND status = $2 ORDER BY booking_datetime DESC",
                ))
                .bind(provider_id)
                .bind(status.as_str())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings \
                     WHERE provider_id = $1 ORDER BY booking_datetime DESC",
                ))
                .bind(provider_id)
                .fetch_all(&self.db)
                .await?
            }
        };

        rows.into_iter().map(BookingRow::into_model).collect()
    }

    /// A customer's bookings, looked up by the email given at creation
    pub async fn list_by_customer_email(&self, email: &str) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE LOWER(customer_email) = LOWER($1) ORDER BY booking_datetime DESC",
        ))
        .bind(email)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(BookingRow::into_model).collect()
    }

    /// Every booking on the platform, for admin reporting
    pub async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY booking_datetime DESC",
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(BookingRow::into_model).collect()
    }

    /// Approve or reject a pending booking on behalf of its provider.
    ///
    /// The status guard makes the decision first-writer-wins; a second
    /// decision on the same booking fails with InvalidStateTransition.
    pub async fn decide(
        &self,
        provider_id: Uuid,
        booking_id: Uuid,
        decision: BookingDecision,
    ) -> AppResult<Booking> {
        let booking = self.get_booking(booking_id).await?;
        if booking.provider_id != provider_id {
            return Err(AppError::Forbidden(
                "booking belongs to another provider".to_string(),
            ));
        }

        let next = decision.as_status();
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings SET
                status = $2,
                approved_at = CASE WHEN $2 = 'approved' THEN NOW() ELSE approved_at END,
                rejected_at = CASE WHEN $2 = 'rejected' THEN NOW() ELSE rejected_at END
            WHERE id = $1 AND status = 'pending'
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(booking_id)
        .bind(next.as_str())
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => row.into_model(),
            None => {
                let current = self.get_booking(booking_id).await?;
                Err(AppError::InvalidStateTransition(format!(
                    "booking is already {}",
                    current.status.as_str()
                )))
            }
        }
    }

    async fn insert(&self, new: NewBooking) -> AppResult<Booking> {
        if new.total_price <= Decimal::ZERO {
            return Err(AppError::InvalidPrice(
                "booking total must be greater than zero".to_string(),
            ));
        }

        let kind = new.details.kind();
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO bookings (
                kind, provider_id, unit_id, unit_name, unit_price, quantity,
                total_price, customer_name, customer_mobile, customer_email, details
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(kind.as_str())
        .bind(new.provider_id)
        .bind(&new.unit_id)
        .bind(&new.unit_name)
        .bind(new.unit_price)
        .bind(new.quantity)
        .bind(new.total_price)
        .bind(&new.customer.name)
        .bind(&new.customer.mobile)
        .bind(&new.customer.email)
        .bind(Json(&new.details))
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            booking_id = %row.id,
            kind = kind.as_str(),
            unit_id = %new.unit_id,
            total = %new.total_price,
            "booking created"
        );

        row.into_model()
    }
}
