/**
 * Server Initialization
 *
 * 1. Open the identity store selected by the configuration
 * 2. Build the hasher and session codec from the configuration
 * 3. Assemble the router
 */

use axum::Router;
use chrono::Duration;

use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::sessions::SessionCodec;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_store;
use crate::backend::server::state::AppState;
use crate::backend::store::StoreError;
use crate::shared::config::RECOMMENDED_SECRET_BYTES;
use crate::shared::AuthConfig;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails only if the database is configured but cannot be reached.
pub async fn create_app(config: &AuthConfig) -> Result<Router, StoreError> {
    tracing::info!("Initializing account service");

    if config.has_weak_secret() {
        tracing::warn!(
            "SESSION_SECRET is shorter than {} bytes; session tokens are easier to forge",
            RECOMMENDED_SECRET_BYTES
        );
    }

    let store = load_store(config).await?;
    let hasher = PasswordHasher::new(config.password_hash_cost);
    let codec = SessionCodec::new(
        config.session_secret.as_bytes(),
        Duration::days(config.session_ttl_days),
    );

    tracing::info!(
        "Router configured (bcrypt cost {}, sessions valid for {} days)",
        hasher.cost(),
        codec.ttl().num_days()
    );

    let app = create_router(AppState::new(store, hasher, codec));
    Ok(app)
}
