/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Public
 * - `POST /register` - create an account from an access code
 * - `POST /login` - start a session
 * - `GET /session` - account behind the session cookie
 * - `POST /logout` - clear the session cookie
 *
 * ## Authenticated
 * - `PATCH /username` - rename the account
 * - `PATCH /password` - replace the password
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};

use crate::backend::auth::handlers::{change_password, change_username, login, logout, register, session};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// The account update routes are wrapped in `auth_middleware`, which answers
/// 401 before the handler runs when the session cookie is missing or invalid.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/username", patch(change_username))
        .route("/password", patch(change_password))
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    router
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/session", get(session))
        .route("/logout", post(logout))
        .merge(authenticated)
}
