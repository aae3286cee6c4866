//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Registration and email confirmation through the identity provider
//! - Login exchange: provider credentials to a locally signed session token
//! - First-login materialization of the local user mirror
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod tokens;
pub mod users;
pub mod validators;


pub use extractors::AuthedUser;
pub use routes::auth_routes;
