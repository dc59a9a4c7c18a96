/**
 * Server Configuration
 *
 * Collects `AuthConfig` from environment variables and opens the identity
 * store it points at.
 *
 * # Variables
 *
 * - `SESSION_SECRET` (required)
 * - `DATABASE_URL` (optional; unset selects the in-memory store)
 * - `SERVER_PORT`, `PASSWORD_HASH_COST`, `SESSION_TTL_DAYS`
 * - `SEED_ACCESS_CODES` as `code=baid,code=baid` (in-memory store only)
 */

use std::str::FromStr;
use std::sync::Arc;

use crate::backend::store::{IdentityStore, MemoryIdentityStore, PgIdentityStore, StoreError};
use crate::shared::{AuthConfig, Baid, ConfigError};

/// Load configuration from the process environment.
pub fn load_config() -> Result<AuthConfig, ConfigError> {
    config_from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from any key lookup.
///
/// Empty values are treated as unset.
pub fn config_from_lookup<F>(lookup: F) -> Result<AuthConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let mut builder = AuthConfig::builder();

    if let Some(secret) = get("SESSION_SECRET") {
        builder = builder.session_secret(secret);
    }
    if let Some(url) = get("DATABASE_URL") {
        builder = builder.database_url(url);
    }
    if let Some(port) = get("SERVER_PORT") {
        builder = builder.server_port(parse_number("SERVER_PORT", &port)?);
    }
    if let Some(cost) = get("PASSWORD_HASH_COST") {
        builder = builder.password_hash_cost(parse_number("PASSWORD_HASH_COST", &cost)?);
    }
    if let Some(days) = get("SESSION_TTL_DAYS") {
        builder = builder.session_ttl_days(parse_number("SESSION_TTL_DAYS", &days)?);
    }
    if let Some(seeds) = get("SEED_ACCESS_CODES") {
        for (code, baid) in parse_seed_access_codes(&seeds)? {
            builder = builder.seed_access_code(code, baid);
        }
    }

    builder.build()
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("'{}' is not a valid number", value)))
}

/// Parse `code=baid,code=baid`.
pub fn parse_seed_access_codes(raw: &str) -> Result<Vec<(String, Baid)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (code, baid) = entry.split_once('=').ok_or_else(|| {
                ConfigError::invalid("SEED_ACCESS_CODES", format!("'{}' is not code=baid", entry))
            })?;
            let code = code.trim();
            if code.is_empty() {
                return Err(ConfigError::invalid("SEED_ACCESS_CODES", "empty access code"));
            }
            Ok((code.to_string(), parse_number("SEED_ACCESS_CODES", baid)?))
        })
        .collect()
}

/// Open the identity store selected by `config`.
///
/// With `DATABASE_URL` set this connects to PostgreSQL and runs the embedded
/// migrations; a migration failure is logged and startup continues, since
/// the schema may already be in place. Otherwise an in-memory store seeded
/// with `SEED_ACCESS_CODES` is returned.
pub async fn load_store(config: &AuthConfig) -> Result<Arc<dyn IdentityStore>, StoreError> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!(
            "DATABASE_URL not set. Using in-memory store with {} seeded access codes; accounts are lost on restart.",
            config.seed_access_codes.len()
        );
        let store = MemoryIdentityStore::with_access_codes(config.seed_access_codes.iter().cloned());
        return Ok(Arc::new(store));
    };

    tracing::info!("Connecting to database...");
    let store = PgIdentityStore::connect(database_url).await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match store.migrate().await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    if !config.seed_access_codes.is_empty() {
        tracing::warn!("SEED_ACCESS_CODES is ignored when DATABASE_URL is set");
    }

    Ok(Arc::new(store))
}
