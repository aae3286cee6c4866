//! Session issuer: bridges provider authentication into local sessions

use sqlx::SqlitePool;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};

use super::models::{
    Claims, ConfirmSignUpRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    RegisterResponse, User, UserSummary,
};
use super::tokens::SessionTokens;
use super::users;
use crate::common::{safe_email_log, ApiError, AppState, Validator};
use crate::identity::{IdentityProvider, SignInOutcome};

pub const REGISTERED_MESSAGE: &str =
    "User registered successfully. Please check your email for verification code.";
pub const CONFIRMED_MESSAGE: &str = "Email confirmed successfully. You can now sign in.";
pub const UNCONFIRMED_MESSAGE: &str =
    "Please confirm your email before signing in. Check your inbox for a confirmation code.";
pub const NO_AUTH_RESULT_MESSAGE: &str = "Authentication failed - no auth result";

pub struct AuthService {
    db: SqlitePool,
    provider: Arc<dyn IdentityProvider>,
    tokens: SessionTokens,
}

impl AuthService {
    pub fn new(db: SqlitePool, provider: Arc<dyn IdentityProvider>, tokens: SessionTokens) -> Self {
        Self {
            db,
            provider,
            tokens,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.db.clone(),
            state.identity_provider.clone(),
            state.session_tokens.clone(),
        )
    }

    /// Starts a registration; no session is issued until the account is
    /// confirmed and the user logs in.
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        request.validate(&request).into_result()?;

        let email = request.email.trim();
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let user_sub = self
            .provider
            .sign_up(email, &request.password, name)
            .await
            .map_err(|e| {
                warn!(email = %safe_email_log(email), error = %e, "Registration rejected by provider");
                ApiError::Unauthorized(format!("Registration failed: {}", e))
            })?;

        info!(email = %safe_email_log(email), "Registration pending email confirmation");

        Ok(RegisterResponse {
            message: REGISTERED_MESSAGE.to_string(),
            user_sub,
        })
    }

    pub async fn confirm_registration(
        &self,
        request: ConfirmSignUpRequest,
    ) -> Result<MessageResponse, ApiError> {
        request.validate(&request).into_result()?;

        let email = request.email.trim();

        self.provider
            .confirm_sign_up(email, request.confirmation_code.trim())
            .await
            .map_err(|e| {
                warn!(email = %safe_email_log(email), error = %e, "Email confirmation rejected by provider");
                ApiError::Unauthorized(format!("Email confirmation failed: {}", e))
            })?;

        info!(email = %safe_email_log(email), "Email confirmed");

        Ok(MessageResponse {
            message: CONFIRMED_MESSAGE.to_string(),
        })
    }

    /// Exchanges provider credentials for a local session token.
    ///
    /// Authenticates against the provider, introspects the returned access
    /// token, materializes the local user on first login, then signs a
    /// session token for that user. The provider refresh token is handed back
    /// untouched.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        request.validate(&request).into_result()?;

        let email = request.email.trim();

        let outcome = self
            .provider
            .authenticate(email, &request.password)
            .await
            .map_err(|e| login_failed(email, e))?;

        let provider_tokens = match outcome {
            SignInOutcome::Authenticated(tokens) => tokens,
            SignInOutcome::Unconfirmed => {
                warn!(email = %safe_email_log(email), "Login attempted before email confirmation");
                return Err(ApiError::Unauthorized(UNCONFIRMED_MESSAGE.to_string()));
            }
            SignInOutcome::NoAuthResult => {
                warn!(email = %safe_email_log(email), "Provider returned no auth result");
                return Err(ApiError::Unauthorized(NO_AUTH_RESULT_MESSAGE.to_string()));
            }
        };

        let identity = self
            .provider
            .introspect(&provider_tokens.access_token)
            .await
            .map_err(|e| login_failed(email, e))?;

        let resolved_email = identity.attribute("email").unwrap_or(email);
        let name = identity.attribute("name");

        let user = users::find_or_create(&self.db, &identity.external_id, resolved_email, name)
            .await
            .map_err(|e| login_failed(email, e))?;

        let access_token = self
            .tokens
            .issue(&user)
            .map_err(|e| login_failed(email, e))?;

        info!(
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            "User authentication successful"
        );

        Ok(LoginResponse {
            access_token,
            refresh_token: provider_tokens.refresh_token,
            user: UserSummary::from(&user),
        })
    }

    /// Maps verified claims back to a live local user.
    ///
    /// The token may outlive the row it names, so existence is rechecked on
    /// every request.
    pub async fn resolve_identity(&self, claims: &Claims) -> Result<User, ApiError> {
        match users::find_by_id(&self.db, &claims.sub).await? {
            Some(user) => Ok(user),
            None => {
                warn!(user_id = %claims.sub, "Authentication failed: user not found in database");
                Err(ApiError::Unauthorized("User not found".to_string()))
            }
        }
    }
}

fn login_failed(email: &str, reason: impl Display) -> ApiError {
    warn!(email = %safe_email_log(email), error = %reason, "Login failed");
    ApiError::Unauthorized(format!("Login failed: {}", reason))
}
