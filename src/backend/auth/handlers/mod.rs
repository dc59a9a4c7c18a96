//! Account Handlers
//!
//! Thin axum handlers over [`AuthService`](crate::backend::auth::service::AuthService).
//! Each one extracts its inputs, calls the service, and maps the result
//! (and the session cookie) onto the response.
//!
//! # Handlers
//!
//! - **`register`** - POST /register
//! - **`login`** - POST /login
//! - **`session`** - GET /session
//! - **`logout`** - POST /logout
//! - **`change_username`** - PATCH /username (authenticated)
//! - **`change_password`** - PATCH /password (authenticated)

/// Request body types
pub mod types;

pub mod register;
pub mod login;
pub mod session;
pub mod logout;

/// Authenticated account updates
pub mod account;

pub use types::{LoginForm, RegisterForm, UpdateAuthUserRequest};

pub use register::register;
pub use login::login;
pub use session::session;
pub use logout::logout;
pub use account::{change_password, change_username};
