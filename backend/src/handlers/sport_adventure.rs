//! HTTP handlers for sport-adventure activities

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::AppResult;
use crate::handlers::SearchQuery;
use crate::middleware::CurrentUser;
use crate::services::sport_adventure::{
    CreateSportAdventureInput, SportAdventureService, UpdateSportAdventureInput,
};
use crate::AppState;
use shared::{CategoryGroup, SportAdventure};

/// Public browse with optional search terms, grouped by activity category
pub async fn browse_sport_adventures(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<CategoryGroup<SportAdventure>>>> {
    let service = SportAdventureService::new(state.db);
    let groups = service.browse(&query.terms()).await?;
    Ok(Json(groups))
}

/// Public detail of one activity
pub async fn get_sport_adventure(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> AppResult<Json<SportAdventure>> {
    let service = SportAdventureService::new(state.db);
    let activity = service.get_by_display_id(&activity_id).await?;
    Ok(Json(activity))
}

/// Create an activity for the logged-in provider
pub async fn create_sport_adventure(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSportAdventureInput>,
) -> AppResult<Json<SportAdventure>> {
    let provider_id = current_user.0.provider_id()?;
    let service = SportAdventureService::new(state.db);
    let activity = service.create(provider_id, input).await?;
    Ok(Json(activity))
}

/// Activities of the logged-in provider
pub async fn list_my_sport_adventures(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<SportAdventure>>> {
    let provider_id = current_user.0.provider_id()?;
    let service = SportAdventureService::new(state.db);
    let activities = service.list_for_provider(provider_id).await?;
    Ok(Json(activities))
}

/// Update an owned activity
pub async fn update_sport_adventure(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(activity_id): Path<String>,
    Json(input): Json<UpdateSportAdventureInput>,
) -> AppResult<Json<SportAdventure>> {
    let provider_id = current_user.0.provider_id()?;
    let service = SportAdventureService::new(state.db);
    let activity = service.update(provider_id, &activity_id, input).await?;
    Ok(Json(activity))
}

/// Delete an owned activity
pub async fn delete_sport_adventure(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(activity_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let provider_id = current_user.0.provider_id()?;
    let service = SportAdventureService::new(state.db);
    service.delete(provider_id, &activity_id).await?;
    Ok(Json(serde_json::json!({ "deleted": activity_id })))
}
