//! Route Configuration Module
//!
//! - **`router`** - main router creation
//! - **`api_routes`** - account endpoints
//!
//! # Routes
//!
//! - `GET /health`
//! - `POST /register`, `POST /login`, `GET /session`, `POST /logout`
//! - `PATCH /username`, `PATCH /password` (session cookie required)

/// Main router creation
pub mod router;

/// Account endpoints
pub mod api_routes;

pub use router::create_router;
