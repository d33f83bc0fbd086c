//! HTTP handlers for booking creation, customer lookup, and the
//! provider's decision endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::BookingService;
use crate::AppState;
use shared::{
    Booking, BookingDecision, BookingStatus, CreateAccommodationBookingInput,
    CreateSportAdventureBookingInput, CreateTransportationBookingInput,
};

#[derive(Debug, Deserialize)]
pub struct CustomerBookingsQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ProviderBookingsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: BookingDecision,
}

/// Book an accommodation room (public)
pub async fn create_accommodation_booking(
    State(state): State<AppState>,
    Json(input): Json<CreateAccommodationBookingInput>,
) -> AppResult<Json<Booking>> {
    let service = BookingService::new(state.db);
    let booking = service.create_accommodation_booking(input).await?;
    Ok(Json(booking))
}

/// Book a transportation unit (public)
pub async fn create_transportation_booking(
    State(state): State<AppState>,
    Json(input): Json<CreateTransportationBookingInput>,
) -> AppResult<Json<Booking>> {
    let service = BookingService::new(state.db);
    let booking = service.create_transportation_booking(input).await?;
    Ok(Json(booking))
}

/// Book a sport-adventure activity (public)
pub async fn create_sport_adventure_booking(
    State(state): State<AppState>,
    Json(input): Json<CreateSportAdventureBookingInput>,
) -> AppResult<Json<Booking>> {
    let service = BookingService::new(state.db);
    let booking = service.create_sport_adventure_booking(input).await?;
    Ok(Json(booking))
}

/// Look up one booking by id (public, the id acts as the reference)
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    let service = BookingService::new(state.db);
    let booking = service.get_booking(booking_id).await?;
    Ok(Json(booking))
}

/// A customer's bookings by the email used at creation (public)
pub async fn list_customer_bookings(
    State(state): State<AppState>,
    Query(query): Query<CustomerBookingsQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let service = BookingService::new(state.db);
    let bookings = service.list_by_customer_email(&query.email).await?;
    Ok(Json(bookings))
}

/// Incoming bookings of the logged-in provider
pub async fn list_provider_bookings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ProviderBookingsQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let provider_id = current_user.0.provider_id()?;

    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(BookingStatus::parse(s).ok_or_else(|| AppError::Validation {
            field: "status".to_string(),
            message: format!("unknown status {s}"),
        })?),
    };

    let service = BookingService::new(state.db);
    let bookings = service.list_for_provider(provider_id, status).await?;
    Ok(Json(bookings))
}

/// Approve or reject a pending booking
pub async fn decide_booking(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(booking_id): Path<Uuid>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<Json<Booking>> {
    let provider_id = current_user.0.provider_id()?;
    let service = BookingService::new(state.db.clone());
    let booking = service.decide(provider_id, booking_id, input.decision).await?;

    let verdict = match input.decision {
        BookingDecision::Approved => "approved",
        BookingDecision::Rejected => "rejected",
    };
    state
        .email
        .send_or_log(
            &booking.customer_email,
            &format!("Your booking has been {verdict}"),
            &format!(
                "Hello {}, your booking for {} ({}) has been {verdict}.",
                booking.customer_name, booking.unit_name, booking.unit_id
            ),
        )
        .await;

    Ok(Json(booking))
}
