// src/common/config.rs
//! Process configuration, read once at startup
//!
//! Everything here is immutable for the lifetime of the process. Rotating
//! `JWT_SECRET` requires a restart and invalidates every outstanding session.

use chrono::{Duration, Utc};
use std::env;
use std::fmt;
use thiserror::Error;

use crate::identity::CognitoConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite://task_api.db";
const DEFAULT_JWT_EXPIRATION: &str = "3600s";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Signing material for session tokens
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: Duration,
}

// The secret must never reach a log line
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub reset_db: bool,
    pub jwt: JwtConfig,
    pub cognito: CognitoConfig,
    pub cors_origins: Vec<String>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let reset_db = get("RESET_DB")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let expiration_raw =
            get("JWT_EXPIRATION_TIME").unwrap_or_else(|| DEFAULT_JWT_EXPIRATION.to_string());
        let expiration =
            parse_duration(&expiration_raw).map_err(|reason| ConfigError::Invalid {
                key: "JWT_EXPIRATION_TIME",
                reason,
            })?;

        let jwt = JwtConfig {
            secret: require("JWT_SECRET")?,
            expiration,
        };

        let cognito = CognitoConfig {
            region: require("AWS_COGNITO_REGION")?,
            user_pool_id: require("AWS_COGNITO_USER_POOL_ID")?,
            client_id: require("AWS_COGNITO_CLIENT_ID")?,
        };

        let cors_origins = get("CORS_ORIGIN")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            reset_db,
            jwt,
            cognito,
            cors_origins,
            port,
        })
    }
}

/// Parses `3600`, `3600s`, `60m`, `12h` or `7d` into a positive duration
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => raw.split_at(idx),
        None => (raw, "s"),
    };

    let value: i64 = digits
        .parse()
        .map_err(|_| format!("'{}' is not a duration", raw))?;
    if value <= 0 {
        return Err(format!("'{}' must be positive", raw));
    }

    let duration = match unit {
        "s" => Duration::try_seconds(value),
        "m" => Duration::try_minutes(value),
        "h" => Duration::try_hours(value),
        "d" => Duration::try_days(value),
        other => return Err(format!("unknown duration unit '{}'", other)),
    };

    // Must also fit on top of the current time, or every token expiry overflows
    duration
        .filter(|d| Utc::now().checked_add_signed(*d).is_some())
        .ok_or_else(|| format!("'{}' is out of range", raw))
}
