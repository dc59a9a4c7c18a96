/**
 * Backend Error Types
 *
 * `AuthError` is the single error type handlers return. Its variants are
 * the failure kinds of the account service:
 *
 * - `InputInvalid` - missing, malformed, or oversized fields (400)
 * - `NotFound` - unknown access code (400)
 * - `Conflict` - username taken or Baid already linked (400 on register,
 *   409 on rename)
 * - `AuthFailure` - wrong credentials, missing/invalid/expired session (401)
 * - `Internal` - store, hashing, or signing failures (500)
 *
 * Messages are short and safe to show to the client. Internal causes are
 * logged where the error is created and never reach the response.
 */

use std::fmt::Display;

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::ConflictKind;
use crate::shared::SharedError;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{message}")]
    InputInvalid { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict {
        kind: ConflictKind,
        status: StatusCode,
        message: String,
    },

    #[error("{message}")]
    AuthFailure { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl AuthError {
    pub fn input_invalid(message: impl Into<String>) -> Self {
        Self::InputInvalid {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(kind: ConflictKind, status: StatusCode, message: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            status,
            message: message.into(),
        }
    }

    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self::AuthFailure {
            message: message.into(),
        }
    }

    /// Generic 401 for missing or rejected sessions
    pub fn unauthorized() -> Self {
        Self::auth_failure(UNAUTHORIZED_MESSAGE)
    }

    /// Log `cause` and produce a terse 500.
    pub fn internal(message: impl Into<String>, cause: impl Display) -> Self {
        let message = message.into();
        tracing::error!("{}: {}", message, cause);
        Self::Internal { message }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InputInvalid { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { status, .. } => *status,
            Self::AuthFailure { .. } => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing message
    pub fn message(&self) -> &str {
        match self {
            Self::InputInvalid { message }
            | Self::NotFound { message }
            | Self::Conflict { message, .. }
            | Self::AuthFailure { message }
            | Self::Internal { message } => message,
        }
    }
}

impl From<SharedError> for AuthError {
    fn from(err: SharedError) -> Self {
        Self::input_invalid(err.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(AuthError::input_invalid("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::not_found("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::unauthorized().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::internal("Error getting user", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AuthError::conflict(ConflictKind::UsernameTaken, StatusCode::CONFLICT, "x").status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_internal_hides_cause() {
        let error = AuthError::internal("Error inserting user", "connection refused at 10.0.0.1");
        assert_eq!(error.message(), "Error inserting user");
        assert!(!error.to_string().contains("10.0.0.1"));
    }

    #[test]
    fn test_from_shared_error() {
        let error: AuthError = SharedError::validation("username", "too long").into();
        match error {
            AuthError::InputInvalid { message } => assert_eq!(message, "too long"),
            _ => panic!("Expected InputInvalid"),
        }
    }
}
