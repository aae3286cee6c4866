//! # Identity Module
//!
//! Gateway to the external identity provider:
//! - `IdentityProvider` trait with normalized outcomes and errors
//! - Cognito user pool implementation

pub mod cognito;
pub mod provider;

pub use cognito::{CognitoConfig, CognitoIdentityProvider};
pub use provider::{IdentityProvider, SignInOutcome};

#[cfg(test)]
pub mod fake;
