//! Authentication Module
//!
//! Account registration, login, and cookie-based sessions for the profile
//! web UI. Accounts are keyed by a player's Baid, which is resolved from the
//! access code printed on their card.
//!
//! # Architecture
//!
//! - **`password`** - bcrypt hashing, run off the async workers
//! - **`sessions`** - signed session tokens carrying the Baid
//! - **`cookies`** - the "Authorization" cookie
//! - **`guard`** - username / Baid uniqueness checks and conflict mapping
//! - **`service`** - the account operations
//! - **`handlers`** - HTTP handlers for the account endpoints
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, password, access code -> account bound to the Baid
//! 2. **Login**: username, password -> session cookie + `{username, baid}`
//! 3. **Session**: cookie -> `{username, baid}`
//! 4. **Logout**: cookie cleared client-side
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Tokens are HMAC signed and expire after `SESSION_TTL_DAYS` (30 by default)
//! - Unknown username and wrong password return the same 401 message

/// Password hashing and verification
pub mod password;

/// Session token minting and verification
pub mod sessions;

/// Session cookie helpers
pub mod cookies;

/// Uniqueness checks
pub mod guard;

/// Account operations
pub mod service;

/// HTTP handlers for account endpoints
pub mod handlers;

pub use password::PasswordHasher;
pub use service::{AuthService, LoginOutcome};
pub use sessions::{SessionCodec, SessionToken, TokenError};
