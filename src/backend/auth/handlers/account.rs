/**
 * Account Update Handlers
 *
 * PATCH /username and PATCH /password. Both routes sit behind the auth
 * middleware, so an `AuthenticatedBaid` is always present here.
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::backend::auth::handlers::types::UpdateAuthUserRequest;
use crate::backend::auth::service::AuthService;
use crate::backend::error::AuthError;
use crate::backend::middleware::AuthenticatedBaid;

pub const INVALID_BODY_MESSAGE: &str = "Invalid Request Body";

fn parse_body(
    body: Result<Json<UpdateAuthUserRequest>, JsonRejection>,
) -> Result<UpdateAuthUserRequest, AuthError> {
    body.map(|Json(request)| request).map_err(|e| {
        tracing::warn!("Rejected account update body: {}", e);
        AuthError::input_invalid(INVALID_BODY_MESSAGE)
    })
}

/// Change username handler
///
/// # Errors
///
/// * `400 Bad Request` - malformed body or username outside 1-20 characters
/// * `409 Conflict` - username already in use
/// * `500 Internal Server Error` - store failure
pub async fn change_username(
    State(auth): State<AuthService>,
    AuthenticatedBaid(baid): AuthenticatedBaid,
    body: Result<Json<UpdateAuthUserRequest>, JsonRejection>,
) -> Result<StatusCode, AuthError> {
    let request = parse_body(body)?;
    auth.change_username(baid, &request.username).await?;
    Ok(StatusCode::OK)
}

/// Change password handler
///
/// # Errors
///
/// * `400 Bad Request` - malformed body or new password outside 8-100 characters
/// * `401 Unauthorized` - current password is wrong
/// * `500 Internal Server Error` - no stored hash, store or hashing failure
pub async fn change_password(
    State(auth): State<AuthService>,
    AuthenticatedBaid(baid): AuthenticatedBaid,
    body: Result<Json<UpdateAuthUserRequest>, JsonRejection>,
) -> Result<StatusCode, AuthError> {
    let request = parse_body(body)?;
    auth.change_password(baid, &request.current_password, &request.new_password)
        .await?;
    Ok(StatusCode::OK)
}
