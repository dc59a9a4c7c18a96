//! Logout handler
//!
//! POST /logout expires the cookie client-side. The token itself is not
//! revoked and stays valid until its `exp`.

use axum::{http::header::SET_COOKIE, response::IntoResponse};

use crate::backend::auth::cookies::cleared_session_cookie;

pub async fn logout() -> impl IntoResponse {
    tracing::debug!("Clearing session cookie");
    [(SET_COOKIE, cleared_session_cookie())]
}
