//! Shared Error Types
//!
//! Field validation failures, shared between the account service and any
//! client code that validates input before submitting it.
//!
//! # Usage
//!
//! ```rust
//! use profile_auth::shared::error::SharedError;
//!
//! let error = SharedError::validation("username", "Username must be less than or equal to 20 characters long");
//! assert_eq!(error.user_message(), "Username must be less than or equal to 20 characters long");
//! ```
use thiserror::Error;

/// Shared error types that can occur on either side of the HTTP boundary
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Field validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message, safe to show to the client
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The bare message, without the field prefix used by `Display`.
    pub fn user_message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
        }
    }
}
