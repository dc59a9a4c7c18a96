//! Profile Auth - account service for the game profile web UI
//!
//! Players bind a username and password to the Baid behind their card's
//! access code, then log in to receive a signed session cookie.
//!
//! # Module Structure
//!
//! - **`shared`** - types shared by every layer
//!   - `AuthUser`, `SimpleAuthUser`, `Baid`
//!   - field validation
//!   - `AuthConfig` and its builder
//!
//! - **`backend`** - server-side code (only compiled with `ssr`)
//!   - Axum HTTP server and routes
//!   - bcrypt password hashing and signed session tokens
//!   - PostgreSQL and in-memory identity stores
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use profile_auth::backend::server::{create_app, load_config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.server_port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
