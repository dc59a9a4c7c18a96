/**
 * Session Handler
 *
 * GET /session returns the account behind the "Authorization" cookie.
 */

use axum::{extract::State, http::HeaderMap, response::Json};

use crate::backend::auth::service::AuthService;
use crate::backend::error::AuthError;
use crate::shared::SimpleAuthUser;

/// Session handler
///
/// # Errors
///
/// * `401 Unauthorized` - missing, invalid or expired cookie, or no account
///   for the Baid in the token
/// * `500 Internal Server Error` - store failure
pub async fn session(
    State(auth): State<AuthService>,
    headers: HeaderMap,
) -> Result<Json<SimpleAuthUser>, AuthError> {
    let user = auth.session(&headers).await?;
    Ok(Json(user))
}
