//! HTTP handlers for provider onboarding and the provider portal

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ProviderService;
use crate::AppState;
use shared::{ServiceProvider, SubmitApplicationInput};

/// Public view of an application's progress
#[derive(Debug, Serialize)]
pub struct ApplicationStatusResponse {
    pub id: Uuid,
    pub business_name: String,
    pub status: String,
    pub payment_status: String,
    pub remarks: Option<String>,
}

/// Submit a provider application (public)
pub async fn submit_application(
    State(state): State<AppState>,
    Json(input): Json<SubmitApplicationInput>,
) -> AppResult<Json<ServiceProvider>> {
    let service = ProviderService::new(state.db);
    let provider = service.submit_application(input).await?;
    Ok(Json(provider))
}

/// Check the status of a submitted application (public)
pub async fn get_application_status(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> AppResult<Json<ApplicationStatusResponse>> {
    let service = ProviderService::new(state.db);
    let provider = service.get_provider(application_id).await?;
    Ok(Json(ApplicationStatusResponse {
        id: provider.id,
        business_name: provider.business_name,
        status: provider.status.as_str().to_string(),
        payment_status: provider.payment_status.as_str().to_string(),
        remarks: provider.remarks,
    }))
}

/// Profile of the logged-in provider
pub async fn get_my_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ServiceProvider>> {
    let provider_id = current_user.0.provider_id()?;
    let service = ProviderService::new(state.db);
    let provider = service.get_provider(provider_id).await?;
    Ok(Json(provider))
}
