//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::services::AuthService;
use super::tokens::TokenError;
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated user extractor
///
/// Verifies the bearer session token and resolves it to a local user. Every
/// protected handler takes this as an argument, so no task operation runs
/// without a resolved owner id.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub external_id: String,
    pub name: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    error!("AppState extension missing from router");
                    ApiError::InternalServer("missing app state".to_string())
                })?;

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        authenticate_bearer(&app_state, header).await
    }
}

/// Accepts "Bearer <token>" or a raw token
fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

/// Turns an `Authorization` header value into an authenticated user
pub async fn authenticate_bearer(
    state: &AppState,
    header: Option<&str>,
) -> Result<AuthedUser, ApiError> {
    let token = match header.and_then(bearer_token) {
        Some(t) => t,
        None => {
            warn!("Authentication failed: missing Authorization header");
            return Err(ApiError::Unauthorized("missing auth".into()));
        }
    };

    let claims = state.session_tokens.verify(token).map_err(|e| {
        match &e {
            TokenError::Expired => debug!("Session token expired"),
            _ => warn!(error = %e, "Session token validation failed"),
        }
        ApiError::Unauthorized("invalid token".into())
    })?;

    let user = AuthService::from_state(state)
        .resolve_identity(&claims)
        .await?;

    debug!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User authentication successful via extractor"
    );

    Ok(AuthedUser {
        id: user.id,
        email: user.email,
        external_id: user.external_id,
        name: user.name,
    })
}
