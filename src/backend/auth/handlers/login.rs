/**
 * Login Handler
 *
 * POST /login with a url-encoded form `username`, `password`.
 *
 * # Process
 *
 * 1. Refuse if the request already carries a live session cookie
 * 2. Verify credentials
 * 3. Set the "Authorization" cookie and return `{username, baid}`
 */

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Json},
    Form,
};

use crate::backend::auth::cookies::session_cookie;
use crate::backend::auth::handlers::types::LoginForm;
use crate::backend::auth::service::{AuthService, INVALID_FORM_MESSAGE};
use crate::backend::error::AuthError;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - already logged in, or invalid form
/// * `401 Unauthorized` - unknown username or wrong password
/// * `500 Internal Server Error` - store, hashing or signing failure
pub async fn login(
    State(auth): State<AuthService>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<impl IntoResponse, AuthError> {
    // Only a cookie that still verifies blocks the login; an expired or
    // garbage cookie is overwritten by the new session.
    auth.ensure_no_live_session(&headers)?;

    let Form(form) = form.map_err(|e| {
        tracing::warn!("Rejected login form: {}", e);
        AuthError::input_invalid(INVALID_FORM_MESSAGE)
    })?;

    let outcome = auth.login(&form.username, &form.password).await?;

    let cookie = session_cookie(&outcome.token.value, outcome.token.expires_at)
        .map_err(|e| AuthError::internal("Error creating token", e))?;

    Ok(([(SET_COOKIE, cookie)], Json(outcome.user)))
}
