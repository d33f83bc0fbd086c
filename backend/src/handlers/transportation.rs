//! HTTP handlers for transportation units

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::AppResult;
use crate::handlers::SearchQuery;
use crate::middleware::CurrentUser;
use crate::services::transportation::{
    CreateTransportationInput, TransportationService, UpdateTransportationInput,
};
use crate::AppState;
use shared::{CategoryGroup, Transportation};

/// Public browse with optional search terms, grouped by vehicle category
pub async fn browse_transportations(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<CategoryGroup<Transportation>>>> {
    let service = TransportationService::new(state.db);
    let groups = service.browse(&query.terms()).await?;
    Ok(Json(groups))
}

/// Public detail of one unit
pub async fn get_transportation(
    State(state): State<AppState>,
    Path(transport_id): Path<String>,
) -> AppResult<Json<Transportation>> {
    let service = TransportationService::new(state.db);
    let transportation = service.get_by_display_id(&transport_id).await?;
    Ok(Json(transportation))
}

/// Create a unit for the logged-in provider
pub async fn create_transportation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateTransportationInput>,
) -> AppResult<Json<Transportation>> {
    let provider_id = current_user.0.provider_id()?;
    let service = TransportationService::new(state.db);
    let transportation = service.create(provider_id, input).await?;
    Ok(Json(transportation))
}

/// Units of the logged-in provider
pub async fn list_my_transportations(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Transportation>>> {
    let provider_id = current_user.0.provider_id()?;
    let service = TransportationService::new(state.db);
    let transportations = service.list_for_provider(provider_id).await?;
    Ok(Json(transportations))
}

/// Update an owned unit
pub async fn update_transportation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transport_id): Path<String>,
    Json(input): Json<UpdateTransportationInput>,
) -> AppResult<Json<Transportation>> {
    let provider_id = current_user.0.provider_id()?;
    let service = TransportationService::new(state.db);
    let transportation = service.update(provider_id, &transport_id, input).await?;
    Ok(Json(transportation))
}

/// Delete an owned unit
pub async fn delete_transportation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(transport_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let provider_id = current_user.0.provider_id()?;
    let service = TransportationService::new(state.db);
    service.delete(provider_id, &transport_id).await?;
    Ok(Json(serde_json::json!({ "deleted": transport_id })))
}
