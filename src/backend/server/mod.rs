//! Server Module
//!
//! Configuration loading, application state, and app construction.
//!
//! - **`config`** - environment configuration and store selection
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`init`** - `create_app`

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{load_config, load_store};
pub use init::create_app;
pub use state::AppState;
