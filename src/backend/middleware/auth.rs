/**
 * Authentication Middleware
 *
 * Protects routes that need a logged-in player. The session cookie is
 * verified once here; on failure the 401 response is produced by the
 * middleware and the handler never runs. On success the Baid is attached to
 * the request extensions for the `AuthenticatedBaid` extractor.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::cookies::read_auth_cookie;
use crate::backend::auth::service::AuthService;
use crate::backend::auth::sessions::{SessionCodec, TokenError};
use crate::backend::error::AuthError;
use crate::shared::Baid;

/// Baid proven by a verified session cookie
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedBaid(pub Baid);

/// Read the "Authorization" cookie and return the Baid it was issued for.
///
/// This is the only place a cookie becomes a Baid: the middleware, Session
/// and Login's live-session check all go through it. Missing, malformed,
/// forged and expired tokens are all 401.
pub fn verify_client_baid(headers: &HeaderMap, codec: &SessionCodec) -> Result<Baid, AuthError> {
    let token = read_auth_cookie(headers).ok_or_else(|| {
        tracing::debug!("No session cookie");
        AuthError::unauthorized()
    })?;

    codec.verify(token).map_err(|e| {
        match e {
            TokenError::Expired => tracing::debug!("Session token expired"),
            other => tracing::warn!("Rejected session token: {}", other),
        }
        AuthError::unauthorized()
    })
}

/// Authentication middleware
///
/// Returns 401 Unauthorized if the cookie is missing or invalid.
pub async fn auth_middleware(
    State(auth): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let baid = verify_client_baid(request.headers(), auth.codec())?;

    request.extensions_mut().insert(AuthenticatedBaid(baid));

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedBaid
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedBaid>()
            .copied()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedBaid not found in request extensions");
                AuthError::unauthorized()
            })
    }
}
