// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::tokens::SessionTokens;
use crate::identity::IdentityProvider;

/// Application state containing database pool, services, and configuration
///
/// Built once in `main` and never mutated afterwards, so handlers share it
/// through a plain `Arc` without locking.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub session_tokens: SessionTokens,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        identity_provider: Arc<dyn IdentityProvider>,
        session_tokens: SessionTokens,
    ) -> Self {
        Self {
            db,
            identity_provider,
            session_tokens,
        }
    }
}
