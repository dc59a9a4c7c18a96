//! Application configuration module
//!
//! Provides the validated configuration consumed by the account service.
//! Values are usually collected from the environment by
//! `backend::server::config`, but the builder can be used directly.

use crate::shared::user::Baid;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_PASSWORD_HASH_COST: u32 = 10;
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;
pub const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Bounds accepted by bcrypt
pub const MIN_PASSWORD_HASH_COST: u32 = 4;
pub const MAX_PASSWORD_HASH_COST: u32 = 31;

/// Application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Symmetric key for signing session tokens
    pub session_secret: String,
    /// PostgreSQL URL; `None` selects the in-memory store
    pub database_url: Option<String>,
    pub server_port: u16,
    pub password_hash_cost: u32,
    pub session_ttl_days: i64,
    /// Access codes preloaded into the in-memory store
    pub seed_access_codes: Vec<(String, Baid)>,
}

impl AuthConfig {
    /// Create a new AuthConfigBuilder
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_secret.is_empty() {
            return Err(ConfigError::MissingValue("SESSION_SECRET"));
        }
        if !(MIN_PASSWORD_HASH_COST..=MAX_PASSWORD_HASH_COST).contains(&self.password_hash_cost) {
            return Err(ConfigError::invalid(
                "PASSWORD_HASH_COST",
                format!(
                    "must be between {} and {}",
                    MIN_PASSWORD_HASH_COST, MAX_PASSWORD_HASH_COST
                ),
            ));
        }
        if !(1..=MAX_SESSION_TTL_DAYS).contains(&self.session_ttl_days) {
            return Err(ConfigError::invalid(
                "SESSION_TTL_DAYS",
                format!("must be between 1 and {}", MAX_SESSION_TTL_DAYS),
            ));
        }
        Ok(())
    }

    /// True when the secret is shorter than the recommended 32 bytes
    pub fn has_weak_secret(&self) -> bool {
        self.session_secret.len() < RECOMMENDED_SECRET_BYTES
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_secret", &"[REDACTED]")
            .field("database_url", &self.database_url.as_ref().map(|_| "[SET]"))
            .field("server_port", &self.server_port)
            .field("password_hash_cost", &self.password_hash_cost)
            .field("session_ttl_days", &self.session_ttl_days)
            .field("seed_access_codes", &self.seed_access_codes.len())
            .finish()
    }
}

/// Builder for AuthConfig
#[derive(Debug, Default)]
pub struct AuthConfigBuilder {
    session_secret: Option<String>,
    database_url: Option<String>,
    server_port: Option<u16>,
    password_hash_cost: Option<u32>,
    session_ttl_days: Option<i64>,
    seed_access_codes: Vec<(String, Baid)>,
}

impl AuthConfigBuilder {
    /// Set the session signing secret
    pub fn session_secret(mut self, secret: impl Into<String>) -> Self {
        self.session_secret = Some(secret.into());
        self
    }

    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    pub fn password_hash_cost(mut self, cost: u32) -> Self {
        self.password_hash_cost = Some(cost);
        self
    }

    pub fn session_ttl_days(mut self, days: i64) -> Self {
        self.session_ttl_days = Some(days);
        self
    }

    /// Add an access code for the in-memory store
    pub fn seed_access_code(mut self, code: impl Into<String>, baid: Baid) -> Self {
        self.seed_access_codes.push((code.into(), baid));
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AuthConfig, ConfigError> {
        let config = AuthConfig {
            session_secret: self
                .session_secret
                .ok_or(ConfigError::MissingValue("SESSION_SECRET"))?,
            database_url: self.database_url,
            server_port: self.server_port.unwrap_or(DEFAULT_SERVER_PORT),
            password_hash_cost: self
                .password_hash_cost
                .unwrap_or(DEFAULT_PASSWORD_HASH_COST),
            session_ttl_days: self.session_ttl_days.unwrap_or(DEFAULT_SESSION_TTL_DAYS),
            seed_access_codes: self.seed_access_codes,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AuthConfig::builder()
            .session_secret("0123456789abcdef0123456789abcdef")
            .build()
            .unwrap();
        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
        assert_eq!(config.password_hash_cost, DEFAULT_PASSWORD_HASH_COST);
        assert_eq!(config.session_ttl_days, 30);
        assert!(config.database_url.is_none());
        assert!(!config.has_weak_secret());
    }

    #[test]
    fn test_missing_secret() {
        let err = AuthConfig::builder().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingValue("SESSION_SECRET"));

        let err = AuthConfig::builder().session_secret("").build().unwrap_err();
        assert_eq!(err, ConfigError::MissingValue("SESSION_SECRET"));
    }

    #[test]
    fn test_rejects_out_of_range_cost() {
        let err = AuthConfig::builder()
            .session_secret("secret")
            .password_hash_cost(3)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PASSWORD_HASH_COST", .. }));
    }

    #[test]
    fn test_rejects_out_of_range_ttl() {
        for days in [0, -1, MAX_SESSION_TTL_DAYS + 1] {
            let err = AuthConfig::builder()
                .session_secret("secret")
                .session_ttl_days(days)
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "SESSION_TTL_DAYS", .. }));
        }
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = AuthConfig::builder()
            .session_secret("super-secret-value")
            .database_url("postgres://user:pw@localhost/db")
            .build()
            .unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-value"));
        assert!(!rendered.contains("pw@localhost"));
        assert!(config.has_weak_secret());
    }
}
