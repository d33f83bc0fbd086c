//! HTTP handlers for accommodation listings

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::AppResult;
use crate::handlers::SearchQuery;
use crate::middleware::CurrentUser;
use crate::services::accommodation::{
    AccommodationService, CreateAccommodationInput, UpdateAccommodationInput,
};
use crate::AppState;
use shared::{Accommodation, CategoryGroup, Room};

/// Public browse with optional search terms, grouped by category
pub async fn browse_accommodations(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<CategoryGroup<Accommodation>>>> {
    let service = AccommodationService::new(state.db);
    let groups = service.browse(&query.terms()).await?;
    Ok(Json(groups))
}

/// Public detail of one listing
pub async fn get_accommodation(
    State(state): State<AppState>,
    Path(accommodation_id): Path<String>,
) -> AppResult<Json<Accommodation>> {
    let service = AccommodationService::new(state.db);
    let accommodation = service.get_by_display_id(&accommodation_id).await?;
    Ok(Json(accommodation))
}

/// Create a listing for the logged-in provider
pub async fn create_accommodation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateAccommodationInput>,
) -> AppResult<Json<Accommodation>> {
    let provider_id = current_user.0.provider_id()?;
    let service = AccommodationService::new(state.db);
    let accommodation = service.create(provider_id, input).await?;
    Ok(Json(accommodation))
}

/// Listings of the logged-in provider
pub async fn list_my_accommodations(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Accommodation>>> {
    let provider_id = current_user.0.provider_id()?;
    let service = AccommodationService::new(state.db);
    let accommodations = service.list_for_provider(provider_id).await?;
    Ok(Json(accommodations))
}

/// Update listing-level fields of an owned listing
pub async fn update_accommodation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(accommodation_id): Path<String>,
    Json(input): Json<UpdateAccommodationInput>,
) -> AppResult<Json<Accommodation>> {
    let provider_id = current_user.0.provider_id()?;
    let service = AccommodationService::new(state.db);
    let accommodation = service.update(provider_id, &accommodation_id, input).await?;
    Ok(Json(accommodation))
}

/// Delete an owned listing
pub async fn delete_accommodation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(accommodation_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let provider_id = current_user.0.provider_id()?;
    let service = AccommodationService::new(state.db);
    service.delete(provider_id, &accommodation_id).await?;
    Ok(Json(serde_json::json!({ "deleted": accommodation_id })))
}

/// Add a room to an owned listing
pub async fn add_room(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(accommodation_id): Path<String>,
    Json(room): Json<Room>,
) -> AppResult<Json<Accommodation>> {
    let provider_id = current_user.0.provider_id()?;
    let service = AccommodationService::new(state.db);
    let accommodation = service.add_room(provider_id, &accommodation_id, room).await?;
    Ok(Json(accommodation))
}

/// Replace a room of an owned listing
pub async fn update_room(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((accommodation_id, room_number)): Path<(String, String)>,
    Json(room): Json<Room>,
) -> AppResult<Json<Accommodation>> {
    let provider_id = current_user.0.provider_id()?;
    let service = AccommodationService::new(state.db);
    let accommodation = service
        .update_room(provider_id, &accommodation_id, &room_number, room)
        .await?;
    Ok(Json(accommodation))
}

/// Remove a room from an owned listing
pub async fn remove_room(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((accommodation_id, room_number)): Path<(String, String)>,
) -> AppResult<Json<Accommodation>> {
    let provider_id = current_user.0.provider_id()?;
    let service = AccommodationService::new(state.db);
    let accommodation = service
        .remove_room(provider_id, &accommodation_id, &room_number)
        .await?;
    Ok(Json(accommodation))
}
