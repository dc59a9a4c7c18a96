//! Backend Error Module
//!
//! - **`types`** - `AuthError` and its status mapping
//! - **`conversion`** - `IntoResponse` for `AuthError`

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::AuthError;
