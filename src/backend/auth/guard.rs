//! Uniqueness Guard
//!
//! A username belongs to at most one account and a Baid is linked to at
//! most one account. The guard runs the cheap pre-checks that produce
//! friendly errors, and translates conflicts reported by the store at write
//! time into the same errors, so a registration that loses a race is
//! answered exactly like one caught by the pre-check.

use std::sync::Arc;

use axum::http::StatusCode;

use crate::backend::error::AuthError;
use crate::backend::store::{ConflictKind, IdentityStore, StoreError, Uniqueness};
use crate::shared::Baid;

pub const USERNAME_EXISTS_MESSAGE: &str = "Username already exists";
pub const ACCESS_CODE_LINKED_MESSAGE: &str = "Access code already linked";
pub const USERNAME_IN_USE_MESSAGE: &str = "Username already in use";

#[derive(Clone)]
pub struct UniquenessGuard {
    store: Arc<dyn IdentityStore>,
}

impl UniquenessGuard {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Fail if a new account with `username` and `baid` would clash.
    pub async fn check_registration(&self, username: &str, baid: Baid) -> Result<(), AuthError> {
        let uniqueness = self
            .store
            .is_auth_user_unique(username, baid)
            .await
            .map_err(|e| AuthError::internal("Error checking if user is unique", e))?;

        match uniqueness {
            Uniqueness::Unique => Ok(()),
            Uniqueness::Taken(kind) => Err(Self::registration_conflict(kind)),
        }
    }

    /// Fail if any account already uses `username`.
    pub async fn check_username_available(&self, username: &str) -> Result<(), AuthError> {
        let existing = self
            .store
            .get_auth_user_by_username(username)
            .await
            .map_err(|e| AuthError::internal("Error checking if username is unique", e))?;

        match existing {
            Some(_) => Err(Self::rename_conflict()),
            None => Ok(()),
        }
    }

    /// Registration clashes are reported as 400.
    pub fn registration_conflict(kind: ConflictKind) -> AuthError {
        let message = match kind {
            ConflictKind::UsernameTaken => USERNAME_EXISTS_MESSAGE,
            ConflictKind::BaidTaken => ACCESS_CODE_LINKED_MESSAGE,
        };
        AuthError::conflict(kind, StatusCode::BAD_REQUEST, message)
    }

    /// Renames onto a taken username are reported as 409.
    pub fn rename_conflict() -> AuthError {
        AuthError::conflict(ConflictKind::UsernameTaken, StatusCode::CONFLICT, USERNAME_IN_USE_MESSAGE)
    }

    /// Translate a failed account insert.
    pub fn on_insert_error(err: StoreError) -> AuthError {
        match err {
            StoreError::Conflict(kind) => {
                tracing::warn!("Registration lost a uniqueness race: {:?}", kind);
                Self::registration_conflict(kind)
            }
            other => AuthError::internal("Error inserting user", other),
        }
    }

    /// Translate a failed username update.
    pub fn on_rename_error(err: StoreError) -> AuthError {
        match err {
            StoreError::Conflict(_) => Self::rename_conflict(),
            other => AuthError::internal("Error changing username", other),
        }
    }
}
