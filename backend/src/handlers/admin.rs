//! HTTP handlers for the admin console: application review, payment
//! tracking, and reporting

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::reporting::{BookingCsvRecord, PlatformMetrics};
use crate::services::{BookingService, ProviderService, ReportingService};
use crate::AppState;
use shared::{PaymentStatus, ProviderStatus, ServiceProvider};

#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectApplicationRequest {
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub provider: ServiceProvider,
    /// Initial login password, also emailed to the provider
    pub initial_password: String,
}

/// List provider applications, optionally filtered by status
pub async fn list_applications(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListApplicationsQuery>,
) -> AppResult<Json<Vec<ServiceProvider>>> {
    current_user.0.require_admin()?;

    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(ProviderStatus::parse(s).ok_or_else(|| AppError::Validation {
            field: "status".to_string(),
            message: format!("unknown status {s}"),
        })?),
    };

    let service = ProviderService::new(state.db);
    let providers = service.list_providers(status).await?;
    Ok(Json(providers))
}

/// Full detail of one application
pub async fn get_application(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(application_id): Path<Uuid>,
) -> AppResult<Json<ServiceProvider>> {
    current_user.0.require_admin()?;
    let service = ProviderService::new(state.db);
    let provider = service.get_provider(application_id).await?;
    Ok(Json(provider))
}

/// Approve a pending application and issue the provider's first password
pub async fn approve_application(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(application_id): Path<Uuid>,
) -> AppResult<Json<ApprovalResponse>> {
    current_user.0.require_admin()?;

    let service = ProviderService::new(state.db.clone());
    let (provider, initial_password) = service
        .approve(application_id, current_user.0.user_id)
        .await?;

    state
        .email
        .send_or_log(
            &provider.email,
            "Your provider application has been approved",
            &format!(
                "Welcome aboard, {}! You can now log in with your email and the \
                 password {initial_password}. Please change it after your first login.",
                provider.owner_full_name
            ),
        )
        .await;

    Ok(Json(ApprovalResponse {
        provider,
        initial_password,
    }))
}

/// Reject a pending application
pub async fn reject_application(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(application_id): Path<Uuid>,
    Json(input): Json<RejectApplicationRequest>,
) -> AppResult<Json<ServiceProvider>> {
    current_user.0.require_admin()?;

    let service = ProviderService::new(state.db.clone());
    let provider = service
        .reject(application_id, current_user.0.user_id, input.remarks)
        .await?;

    state
        .email
        .send_or_log(
            &provider.email,
            "Your provider application",
            &format!(
                "We are sorry, {}. Your application was not approved.{}",
                provider.owner_full_name,
                provider
                    .remarks
                    .as_deref()
                    .map(|r| format!(" Remarks: {r}"))
                    .unwrap_or_default()
            ),
        )
        .await;

    Ok(Json(provider))
}

/// Record the onboarding-fee outcome for a provider
pub async fn record_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(application_id): Path<Uuid>,
    Json(input): Json<RecordPaymentRequest>,
) -> AppResult<Json<ServiceProvider>> {
    current_user.0.require_admin()?;
    let service = ProviderService::new(state.db);
    let provider = service
        .record_payment(application_id, input.payment_status)
        .await?;
    Ok(Json(provider))
}

/// Platform-wide counters for the admin dashboard
pub async fn platform_metrics(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<PlatformMetrics>> {
    current_user.0.require_admin()?;
    let service = ReportingService::new(state.db);
    let metrics = service.platform_metrics().await?;
    Ok(Json(metrics))
}

/// Every booking on the platform as a CSV download
pub async fn export_bookings_csv(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Response> {
    current_user.0.require_admin()?;

    let bookings = BookingService::new(state.db).list_all().await?;
    let records: Vec<BookingCsvRecord> = bookings.iter().map(BookingCsvRecord::from).collect();
    let csv = ReportingService::export_to_csv(&records)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"bookings.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
