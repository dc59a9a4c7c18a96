//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - session cookie verification for protected routes

pub mod auth;

pub use auth::{auth_middleware, verify_client_baid, AuthenticatedBaid};
