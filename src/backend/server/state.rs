/**
 * Application State
 *
 * `AppState` is the router state. It is cheap to clone: the account service
 * holds its store, codec, and guard behind `Arc`s. Handlers extract the
 * `AuthService` directly through `FromRef`.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::service::AuthService;
use crate::backend::auth::sessions::SessionCodec;
use crate::backend::store::IdentityStore;

#[derive(Clone)]
pub struct AppState {
    /// Account operations shared by every handler
    pub auth: AuthService,
}

impl AppState {
    pub fn new(store: Arc<dyn IdentityStore>, hasher: PasswordHasher, codec: SessionCodec) -> Self {
        Self {
            auth: AuthService::new(store, hasher, codec),
        }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}
