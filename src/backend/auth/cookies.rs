//! The `Authorization` session cookie.
//!
//! Set with `HttpOnly; Secure; SameSite=Lax; Path=/` and an explicit
//! `Expires`; cleared by re-sending the same attributes with an empty value
//! and an expiry at the Unix epoch.

use axum::http::header::{InvalidHeaderValue, COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use chrono::{DateTime, Utc};

pub const AUTH_COOKIE_NAME: &str = "Authorization";

/// RFC 7231 IMF-fixdate
const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Value of the session cookie sent by the client, if any.
///
/// Looks through every `Cookie` header; the first matching pair wins.
/// A present-but-empty cookie is returned as `Some("")`.
pub fn read_auth_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE_NAME)
        .map(|(_, value)| value.trim_matches('"'))
}

/// `Set-Cookie` value carrying a session token.
pub fn session_cookie(token: &str, expires_at: DateTime<Utc>) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&render(token, expires_at))
}

/// `Set-Cookie` value that makes the browser drop the session.
pub fn cleared_session_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "Authorization=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; Secure; SameSite=Lax",
    )
}

fn render(value: &str, expires_at: DateTime<Utc>) -> String {
    format!(
        "{}={}; Path=/; Expires={}; HttpOnly; Secure; SameSite=Lax",
        AUTH_COOKIE_NAME,
        value,
        expires_at.format(COOKIE_DATE_FORMAT)
    )
}
