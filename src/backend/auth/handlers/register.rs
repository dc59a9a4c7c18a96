/**
 * Register Handler
 *
 * POST /register with a url-encoded form `username`, `password`,
 * `accessCode`. Answers 200 with an empty body; the client logs in
 * afterwards.
 */

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    Form,
};

use crate::backend::auth::handlers::types::RegisterForm;
use crate::backend::auth::service::{AuthService, INVALID_FORM_MESSAGE};
use crate::backend::error::AuthError;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid form, unknown access code, duplicate
///   username or already linked access code
/// * `500 Internal Server Error` - store or hashing failure
pub async fn register(
    State(auth): State<AuthService>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Result<StatusCode, AuthError> {
    let Form(form) = form.map_err(|e| {
        tracing::warn!("Rejected register form: {}", e);
        AuthError::input_invalid(INVALID_FORM_MESSAGE)
    })?;

    auth.register(&form.username, &form.password, &form.access_code)
        .await?;
    Ok(StatusCode::OK)
}
