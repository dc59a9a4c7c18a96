//! Identity Store
//!
//! Persistence of account rows and the read-only access code table.
//!
//! # Implementations
//!
//! - **`PgIdentityStore`** - PostgreSQL via sqlx, uniqueness enforced by
//!   `auth_user_username_key` and `auth_user_baid_key`
//! - **`MemoryIdentityStore`** - process-local tables behind a single lock,
//!   used for development and tests
//!
//! # Uniqueness
//!
//! Both implementations must reject a second row with the same username or
//! the same Baid at write time and report it as `StoreError::Conflict`, so two
//! concurrent registrations cannot both succeed even after passing the
//! pre-check in `is_auth_user_unique`.

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::{AuthUser, Baid};

pub mod memory;
pub mod postgres;

pub use memory::MemoryIdentityStore;
pub use postgres::PgIdentityStore;

/// Which uniqueness rule a write would break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    UsernameTaken,
    BaidTaken,
}

/// Result of `is_auth_user_unique`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    Unique,
    Taken(ConflictKind),
}

/// Store-level failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("unique constraint violated: {0:?}")]
    Conflict(ConflictKind),

    /// An update targeted a Baid without an account
    #[error("no account is linked to baid {0}")]
    UnknownBaid(Baid),

    /// Baid does not fit the BIGINT column
    #[error("baid {0} is out of range for storage")]
    BaidOutOfRange(Baid),

    /// A stored Baid could not be converted back
    #[error("stored baid {0} is negative")]
    CorruptBaid(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Operations the account service needs from persistence.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// failures of the store itself.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Resolve an out-of-band access code to the Baid it belongs to.
    async fn get_baid_from_access_code(&self, access_code: &str) -> Result<Option<Baid>, StoreError>;

    /// Check whether an account with this username or Baid already exists.
    /// A username clash is reported before a Baid clash.
    async fn is_auth_user_unique(&self, username: &str, baid: Baid) -> Result<Uniqueness, StoreError>;

    async fn insert_auth_user(&self, user: &AuthUser) -> Result<(), StoreError>;

    async fn get_auth_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, StoreError>;

    async fn get_username_by_baid(&self, baid: Baid) -> Result<Option<String>, StoreError>;

    async fn get_password_hash_by_baid(&self, baid: Baid) -> Result<Option<String>, StoreError>;

    async fn change_username(&self, baid: Baid, new_username: &str) -> Result<(), StoreError>;

    async fn change_password(&self, baid: Baid, new_hash: &str) -> Result<(), StoreError>;
}
