//! HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthService, AuthTokens};
use crate::AppState;

/// Login credentials
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Provider login
pub async fn provider_login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db, &state.config);
    let tokens = service.provider_login(&input.email, &input.password).await?;
    Ok(Json(tokens))
}

/// Admin login
pub async fn admin_login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db, &state.config);
    let tokens = service.admin_login(&input.email, &input.password).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new token pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db, &state.config);
    let tokens = service.refresh_token(&input.refresh_token)?;
    Ok(Json(tokens))
}

/// Change the password of the logged-in account
pub async fn change_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let service = AuthService::new(state.db, &state.config);
    service
        .change_password(
            current_user.0.user_id,
            current_user.0.role.as_str(),
            &input.current_password,
            &input.new_password,
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "password changed".to_string(),
    }))
}

/// Start the forgot-password flow. The response is identical whether or
/// not the email matches an account.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    if let Some(code) = service.request_password_otp(&input.email).await? {
        state
            .email
            .send_or_log(
                &input.email,
                "Your password reset code",
                &format!("Your one-time password reset code is {code}. It expires in 15 minutes."),
            )
            .await;
    }
    Ok(Json(MessageResponse {
        message: "if the email is registered, a reset code has been sent".to_string(),
    }))
}

/// Redeem a reset code and set a new password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let service = AuthService::new(state.db, &state.config);
    service
        .reset_password_with_otp(&input.email, &input.code, &input.new_password)
        .await?;
    Ok(Json(MessageResponse {
        message: "password reset".to_string(),
    }))
}
