//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::common::safe_token_log;

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    /// Local user id
    pub sub: String,
    pub email: String,
    #[serde(rename = "externalId")]
    pub external_id: String,
    pub exp: usize,
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Public projection returned alongside a session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

// Request payloads carry credentials, so none of them derive Debug.

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmSignUpRequest {
    pub email: String,
    #[serde(rename = "confirmationCode", alias = "code")]
    pub confirmation_code: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Acknowledgment that the account awaits email confirmation
#[derive(Serialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "userSub")]
    pub user_sub: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Provider refresh token, passed through untouched
    pub refresh_token: Option<String>,
    pub user: UserSummary,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &safe_token_log(&self.access_token))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<present>"))
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct MeResponse {
    pub user: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_debug_masks_tokens() {
        let response = LoginResponse {
            access_token: "eyJhbGciOiJIUzI1NiJ9.payload.signature".to_string(),
            refresh_token: Some("refresh-secret".to_string()),
            user: UserSummary {
                id: "U_1".to_string(),
                email: "alice@example.com".to_string(),
                name: None,
            },
        };

        let rendered = format!("{:?}", response);
        assert!(!rendered.contains("payload"));
        assert!(!rendered.contains("refresh-secret"));
        assert!(rendered.contains("U_1"));
    }
}
