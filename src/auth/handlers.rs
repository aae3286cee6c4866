//! Authentication handlers

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use std::sync::Arc;

use super::extractors::AuthedUser;
use super::models::{
    ConfirmSignUpRequest, LoginRequest, LoginResponse, MeResponse, MessageResponse,
    RegisterRequest, RegisterResponse, UserSummary,
};
use super::services::AuthService;
use crate::common::{ApiError, AppState};

/// POST /auth/register
/// Registers an account with the identity provider
///
/// # Request Body
/// ```json
/// { "email": "alice@example.com", "password": "...", "name": "Alice" }
/// ```
///
/// # Response
/// ```json
/// { "message": "User registered successfully. ...", "userSub": "<provider id>" }
/// ```
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let response = AuthService::from_state(&state).register(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/confirm-signup
/// Confirms the account with the emailed code
///
/// # Request Body
/// ```json
/// { "email": "alice@example.com", "confirmationCode": "123456" }
/// ```
pub async fn confirm_signup(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ConfirmSignUpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let response = AuthService::from_state(&state)
        .confirm_registration(payload)
        .await?;
    Ok(Json(response))
}

/// POST /auth/login
/// Exchanges provider credentials for a local session token
///
/// # Response
/// ```json
/// {
///   "access_token": "<session jwt>",
///   "refresh_token": "<provider refresh token>",
///   "user": { "id": "U_...", "email": "...", "name": "..." }
/// }
/// ```
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = AuthService::from_state(&state).login(payload).await?;
    Ok(Json(response))
}

/// GET /auth/me
/// Returns the user the extractor already resolved for this request
pub async fn me_handler(authed: AuthedUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: UserSummary {
            id: authed.id,
            email: authed.email,
            name: authed.name,
        },
    })
}
