//! Backend Module
//!
//! Server-side code for the account service: an Axum HTTP server in front
//! of an identity store. Only compiled with the `ssr` feature.
//!
//! # Architecture
//!
//! - **`server`** - configuration, application state, app creation
//! - **`routes`** - router assembly
//! - **`auth`** - hashing, session tokens, cookies, account operations, handlers
//! - **`middleware`** - session verification for protected routes
//! - **`store`** - identity store trait with PostgreSQL and in-memory backends
//! - **`error`** - `AuthError` and its HTTP mapping
//!
//! # Thread Safety
//!
//! `AppState` is cloned into every request. The store is shared behind an
//! `Arc<dyn IdentityStore>`; the hasher and codec are immutable after
//! startup. bcrypt work runs on the blocking pool.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and account management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Identity persistence
pub mod store;

pub use error::AuthError;
pub use server::create_app;
