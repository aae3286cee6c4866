//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /auth/register` - Start registration with the identity provider
/// - `POST /auth/confirm-signup` - Confirm the emailed code
/// - `POST /auth/login` - Exchange credentials for a session token
/// - `GET /auth/me` - Get current user information
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/confirm-signup", post(handlers::confirm_signup))
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::me_handler))
}
