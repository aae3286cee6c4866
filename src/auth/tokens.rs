//! Session token signing and verification

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use thiserror::Error;

use super::models::{Claims, User};
use crate::common::config::JwtConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign session token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("session expiry is out of range")]
    ExpiryOutOfRange,

    #[error("session token expired")]
    Expired,

    #[error("invalid session token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// HS256 signer holding the process-wide secret
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration: Duration,
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

impl SessionTokens {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            expiration: config.expiration,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    /// Signs `{sub, email, externalId, exp}` with `exp = issued_at + expiration`
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let exp = issued_at
            .checked_add_signed(self.expiration)
            .ok_or(TokenError::ExpiryOutOfRange)?
            .timestamp()
            .max(0) as usize;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            external_id: user.external_id.clone(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Rejects tokens that are expired or not signed with our secret
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                    TokenError::Expired
                } else {
                    TokenError::Invalid(e)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(secret: &str) -> SessionTokens {
        SessionTokens::new(&JwtConfig {
            secret: secret.to_string(),
            expiration: Duration::seconds(3600),
        })
    }

    fn user() -> User {
        User {
            id: "U_TEST000001".to_string(),
            external_id: "cognito-123".to_string(),
            email: "test@example.com".to_string(),
            name: Some("Test User".to_string()),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = tokens("test_secret_key");
        let issued_at = Utc::now();
        let token = signer.issue_at(&user(), issued_at).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "U_TEST000001");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.external_id, "cognito-123");
        assert_eq!(claims.exp, (issued_at.timestamp() + 3600) as usize);
    }

    #[test]
    fn test_claims_use_external_id_wire_name() {
        let claims = Claims {
            sub: "U_1".to_string(),
            email: "a@example.com".to_string(),
            external_id: "sub-1".to_string(),
            exp: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["externalId"], "sub-1");
        assert!(json.get("external_id").is_none());
    }

    #[test]
    fn test_verify_fails_with_wrong_secret() {
        let token = tokens("test_secret_key").issue(&user()).unwrap();
        let result = tokens("wrong_secret_key").verify(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let signer = tokens("test_secret_key");
        let token = signer
            .issue_at(&user(), Utc::now() - Duration::hours(3))
            .unwrap();

        assert!(matches!(signer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_issue_reports_expiry_overflow() {
        let signer = tokens("test_secret_key");
        let result = signer.issue_at(&user(), DateTime::<Utc>::MAX_UTC);
        assert!(matches!(result, Err(TokenError::ExpiryOutOfRange)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(
            tokens("test_secret_key").verify("not.a.token"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", tokens("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
