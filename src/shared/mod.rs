//! Shared Module
//!
//! Types that are independent of the HTTP server: the account model,
//! form validation rules, configuration, and shared errors. Nothing in
//! here touches the database or the network.

/// Account model
pub mod user;

/// Username and password rules
pub mod validation;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

pub use user::{AuthUser, Baid, SimpleAuthUser};
pub use error::SharedError;
pub use config::{AuthConfig, AuthConfigBuilder, ConfigError};
