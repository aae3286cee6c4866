// src/identity/provider.rs
//! Normalized contract for the external identity provider

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// Transport or business failure reported by the provider. The message is
    /// the provider's own and is safe to show to the end user.
    #[error("{0}")]
    RequestFailed(String),
}

/// Tokens issued by the provider on a successful sign-in
#[derive(Clone, PartialEq)]
pub struct ProviderTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for ProviderTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderTokens")
            .field("access_token", &crate::common::safe_token_log(&self.access_token))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<present>"))
            .finish()
    }
}

/// Result of a password sign-in that reached the provider
#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    Authenticated(ProviderTokens),
    /// Account exists but its email was never confirmed
    Unconfirmed,
    /// Provider answered without an authentication result (e.g. a pending
    /// challenge this service does not drive)
    NoAuthResult,
}

/// Subject behind a provider access token
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderIdentity {
    pub external_id: String,
    pub attributes: HashMap<String, String>,
}

impl ProviderIdentity {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// The four provider operations the session issuer relies on.
///
/// Implementations perform no retries; failures surface immediately.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers a new account and returns the provider's subject id
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<String, ProviderError>;

    async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), ProviderError>;

    async fn authenticate(&self, email: &str, password: &str)
        -> Result<SignInOutcome, ProviderError>;

    async fn introspect(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError>;
}
