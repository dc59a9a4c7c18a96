/**
 * Account Data Structures
 *
 * `AuthUser` is the persisted account row binding a username and password
 * hash to a Baid. `SimpleAuthUser` is the projection returned to clients;
 * it never carries the hash.
 */
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player identifier assigned by the game backend.
pub type Baid = u64;

/// A registered account.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Unique, 1-20 characters
    pub username: String,
    /// Unique, linked through an access code at registration
    pub baid: Baid,
    /// Self-describing bcrypt hash
    pub password_hash: String,
}

impl AuthUser {
    pub fn new(username: impl Into<String>, baid: Baid, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            baid,
            password_hash: password_hash.into(),
        }
    }

    /// Client-safe projection of this account
    pub fn to_simple(&self) -> SimpleAuthUser {
        SimpleAuthUser {
            username: self.username.clone(),
            baid: self.baid,
        }
    }
}

impl fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthUser")
            .field("username", &self.username)
            .field("baid", &self.baid)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Account as seen by the web UI: `{"username": "...", "baid": 42}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAuthUser {
    pub username: String,
    pub baid: Baid,
}
