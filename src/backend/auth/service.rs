/**
 * Account Service
 *
 * The registration / login / session state machine. Every operation is a
 * plain async function returning `Result<_, AuthError>`; handlers only
 * translate HTTP bodies and cookies in and out.
 *
 * # States (per player)
 *
 * - Unregistered -> Registered: `register`
 * - Registered -> Authenticated: `login` (client holds the cookie)
 * - Authenticated -> Authenticated: `change_username`, `change_password`
 * - Authenticated -> Registered: logout clears the cookie client-side; the
 *   token itself stays valid until it expires
 *
 * # Security
 *
 * - Unknown username and wrong password produce the same 401 message
 * - Password material and tokens are never logged
 */

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::backend::auth::guard::UniquenessGuard;
use crate::backend::auth::password::{HashError, PasswordHasher};
use crate::backend::auth::sessions::{SessionCodec, SessionToken};
use crate::backend::error::AuthError;
use crate::backend::middleware::verify_client_baid;
use crate::backend::store::IdentityStore;
use crate::shared::validation::{
    validate_new_password, validate_username, USERNAME_LENGTH_MESSAGE, USERNAME_MAX_CHARS,
};
use crate::shared::{AuthUser, Baid, SimpleAuthUser};

pub const INVALID_FORM_MESSAGE: &str = "Invalid form";
pub const ACCESS_CODE_NOT_FOUND_MESSAGE: &str = "Access code not found";
pub const ALREADY_LOGGED_IN_MESSAGE: &str = "User already logged in";
pub const BAD_CREDENTIALS_MESSAGE: &str = "Username or Password is incorrect";
pub const WRONG_PASSWORD_MESSAGE: &str = "Password is incorrect";
pub const PASSWORD_TOO_LONG_MESSAGE: &str = "Password is too long";
pub const NEW_PASSWORD_TOO_LONG_MESSAGE: &str = "New password is too long";

/// A password bcrypt would truncate is the client's fault, anything else is ours.
fn hash_failure(too_long_message: &'static str, context: &'static str) -> impl Fn(HashError) -> AuthError {
    move |err| match err {
        HashError::TooLong(len) => {
            tracing::warn!("Refused {} byte password", len);
            AuthError::input_invalid(too_long_message)
        }
        other => AuthError::internal(context, other),
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: SimpleAuthUser,
    pub token: SessionToken,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    guard: UniquenessGuard,
    hasher: PasswordHasher,
    codec: Arc<SessionCodec>,
}

impl AuthService {
    pub fn new(store: Arc<dyn IdentityStore>, hasher: PasswordHasher, codec: SessionCodec) -> Self {
        Self {
            guard: UniquenessGuard::new(store.clone()),
            store,
            hasher,
            codec: Arc::new(codec),
        }
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Bind `username` and `password` to the Baid behind `access_code`.
    ///
    /// No session is issued; the client logs in afterwards.
    ///
    /// # Errors
    ///
    /// * `InputInvalid` - a field is empty, the username is longer than 20
    ///   characters, or the password is too long for bcrypt
    /// * `NotFound` - the access code is unknown
    /// * `Conflict` (400) - username taken or access code already linked
    /// * `Internal` - store or hashing failure
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        access_code: &str,
    ) -> Result<SimpleAuthUser, AuthError> {
        if username.is_empty() || password.is_empty() || access_code.is_empty() {
            return Err(AuthError::input_invalid(INVALID_FORM_MESSAGE));
        }
        if username.chars().count() > USERNAME_MAX_CHARS {
            return Err(AuthError::input_invalid(USERNAME_LENGTH_MESSAGE));
        }

        let baid = self
            .store
            .get_baid_from_access_code(access_code)
            .await
            .map_err(|e| AuthError::internal("Error getting access code", e))?
            .ok_or_else(|| AuthError::not_found(ACCESS_CODE_NOT_FOUND_MESSAGE))?;
        tracing::debug!("Access code resolved to baid {}", baid);

        self.guard.check_registration(username, baid).await?;

        let password_hash = self
            .hasher
            .hash(password)
            .await
            .map_err(hash_failure(PASSWORD_TOO_LONG_MESSAGE, "Error hashing password"))?;

        let user = AuthUser::new(username, baid, password_hash);
        self.store
            .insert_auth_user(&user)
            .await
            .map_err(UniquenessGuard::on_insert_error)?;

        tracing::info!("Registered {} for baid {}", user.username, user.baid);
        Ok(user.to_simple())
    }

    /// Refuse to log in on top of a session the client still holds.
    ///
    /// Only a cookie that verifies counts; stale or garbage cookies are
    /// ignored so they cannot lock the player out.
    pub fn ensure_no_live_session(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        match verify_client_baid(headers, &self.codec) {
            Ok(_) => Err(AuthError::input_invalid(ALREADY_LOGGED_IN_MESSAGE)),
            Err(_) => Ok(()),
        }
    }

    /// Check credentials and mint a session token.
    ///
    /// # Errors
    ///
    /// * `InputInvalid` - a field is empty
    /// * `AuthFailure` - unknown username or wrong password (same message)
    /// * `Internal` - store, hashing, or signing failure
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        if username.is_empty() || password.is_empty() {
            tracing::warn!("Invalid login form for username={}", username);
            return Err(AuthError::input_invalid(INVALID_FORM_MESSAGE));
        }

        let user = self
            .store
            .get_auth_user_by_username(username)
            .await
            .map_err(|e| AuthError::internal("Error getting user", e))?
            .ok_or_else(|| {
                tracing::warn!("Login for unknown username {}", username);
                AuthError::auth_failure(BAD_CREDENTIALS_MESSAGE)
            })?;

        let check = self
            .hasher
            .verify(&user.password_hash, password)
            .await
            .map_err(|e| AuthError::internal("Error checking password", e))?;
        if !check.is_match() {
            tracing::warn!("Wrong password for {}", username);
            return Err(AuthError::auth_failure(BAD_CREDENTIALS_MESSAGE));
        }

        let token = self
            .codec
            .mint(user.baid)
            .map_err(|e| AuthError::internal("Error creating token", e))?;

        tracing::info!("{} logged in (baid {})", user.username, user.baid);
        Ok(LoginOutcome {
            user: user.to_simple(),
            token,
        })
    }

    /// Current account for a session cookie.
    ///
    /// Expired tokens and tokens whose Baid has no account are both 401.
    pub async fn session(&self, headers: &HeaderMap) -> Result<SimpleAuthUser, AuthError> {
        let baid = verify_client_baid(headers, &self.codec)?;

        let username = self
            .store
            .get_username_by_baid(baid)
            .await
            .map_err(|e| AuthError::internal("Error getting user", e))?
            .ok_or_else(|| {
                tracing::warn!("Session for baid {} without an account", baid);
                AuthError::unauthorized()
            })?;

        Ok(SimpleAuthUser { username, baid })
    }

    /// Rename the account linked to `baid`.
    ///
    /// # Errors
    ///
    /// * `InputInvalid` - new username outside 1-20 characters
    /// * `Conflict` (409) - username already in use
    /// * `Internal` - store failure
    pub async fn change_username(&self, baid: Baid, new_username: &str) -> Result<(), AuthError> {
        validate_username(new_username)?;
        self.guard.check_username_available(new_username).await?;

        self.store
            .change_username(baid, new_username)
            .await
            .map_err(UniquenessGuard::on_rename_error)?;

        tracing::info!("Baid {} renamed to {}", baid, new_username);
        Ok(())
    }

    /// Replace the password of the account linked to `baid`.
    ///
    /// The current password is checked before the new one is validated.
    ///
    /// # Errors
    ///
    /// * `AuthFailure` - current password is wrong
    /// * `InputInvalid` - new password outside 8-100 characters or too long for bcrypt
    /// * `Internal` - no stored hash for `baid`, store or hashing failure
    pub async fn change_password(
        &self,
        baid: Baid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let stored_hash = self
            .store
            .get_password_hash_by_baid(baid)
            .await
            .map_err(|e| AuthError::internal("Error checking password", e))?
            .ok_or_else(|| {
                AuthError::internal(
                    "Error checking password",
                    format!("no hash stored for baid {}", baid),
                )
            })?;

        let check = self
            .hasher
            .verify(&stored_hash, current_password)
            .await
            .map_err(|e| AuthError::internal("Error checking password", e))?;
        if !check.is_match() {
            tracing::warn!("Wrong current password for baid {}", baid);
            return Err(AuthError::auth_failure(WRONG_PASSWORD_MESSAGE));
        }

        validate_new_password(new_password)?;

        let new_hash = self
            .hasher
            .hash(new_password)
            .await
            .map_err(hash_failure(NEW_PASSWORD_TOO_LONG_MESSAGE, "Error hashing new password"))?;

        self.store
            .change_password(baid, &new_hash)
            .await
            .map_err(|e| AuthError::internal("Error changing password", e))?;

        tracing::info!("Password changed for baid {}", baid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::MemoryIdentityStore;
    use assert_matches::assert_matches;
    use axum::http::{header::COOKIE, HeaderValue, StatusCode};
    use chrono::Duration;

    fn cookie(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&format!("Authorization={}", token)).unwrap());
        headers
    }

    fn service() -> AuthService {
        let store = MemoryIdentityStore::with_access_codes([("AC-001", 42), ("AC-002", 43)]);
        AuthService::new(
            Arc::new(store),
            PasswordHasher::new(4),
            SessionCodec::with_default_ttl(b"0123456789abcdef0123456789abcdef"),
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service();
        let user = auth.register("drummer", "sticks123", "AC-001").await.unwrap();
        assert_eq!(user, SimpleAuthUser { username: "drummer".into(), baid: 42 });

        let outcome = auth.login("drummer", "sticks123").await.unwrap();
        assert_eq!(outcome.user.baid, 42);
        assert_eq!(auth.codec().verify(&outcome.token.value).unwrap(), 42);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let auth = service();

        let err = auth.register("", "pw", "AC-001").await.unwrap_err();
        assert_eq!(err.message(), INVALID_FORM_MESSAGE);

        let err = auth.register(&"x".repeat(21), "pw", "AC-001").await.unwrap_err();
        assert_eq!(err.message(), USERNAME_LENGTH_MESSAGE);

        let err = auth.register("drummer", "pw", "AC-404").await.unwrap_err();
        assert_matches!(err, AuthError::NotFound { .. });
        assert_eq!(err.message(), ACCESS_CODE_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_register_accepts_short_password() {
        assert!(service().register("drummer", "x", "AC-001").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicates() {
        let auth = service();
        auth.register("drummer", "sticks123", "AC-001").await.unwrap();

        let err = auth.register("drummer", "sticks123", "AC-002").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Username already exists");

        let err = auth.register("other", "sticks123", "AC-001").await.unwrap_err();
        assert_eq!(err.message(), "Access code already linked");
    }

    #[tokio::test]
    async fn test_login_failures_share_message() {
        let auth = service();
        auth.register("drummer", "sticks123", "AC-001").await.unwrap();

        let unknown = auth.login("nobody", "sticks123").await.unwrap_err();
        let wrong = auth.login("drummer", "wrong").await.unwrap_err();
        assert_eq!(unknown.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.message(), wrong.message());
        assert_eq!(wrong.message(), BAD_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_live_session_blocks_login_but_stale_does_not() {
        let auth = service();
        let live = auth.codec().mint(42).unwrap();
        let expired = auth.codec().mint_with_ttl(42, Duration::seconds(-5)).unwrap();

        let err = auth.ensure_no_live_session(&cookie(&live.value)).unwrap_err();
        assert_eq!(err.message(), ALREADY_LOGGED_IN_MESSAGE);
        assert!(auth.ensure_no_live_session(&cookie(&expired.value)).is_ok());
        assert!(auth.ensure_no_live_session(&cookie("garbage")).is_ok());
        assert!(auth.ensure_no_live_session(&HeaderMap::new()).is_ok());
    }

    #[tokio::test]
    async fn test_session() {
        let auth = service();
        auth.register("drummer", "sticks123", "AC-001").await.unwrap();
        let token = auth.login("drummer", "sticks123").await.unwrap().token;

        let user = auth.session(&cookie(&token.value)).await.unwrap();
        assert_eq!(user.username, "drummer");

        let err = auth.session(&HeaderMap::new()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        let err = auth.session(&cookie("x.y.z")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let expired = auth.codec().mint_with_ttl(42, Duration::seconds(-5)).unwrap();
        let err = auth.session(&cookie(&expired.value)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        // valid signature, but nobody owns baid 43
        let orphan = auth.codec().mint(43).unwrap();
        let err = auth.session(&cookie(&orphan.value)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Unauthorized");
    }

    #[tokio::test]
    async fn test_change_username() {
        let auth = service();
        auth.register("drummer", "sticks123", "AC-001").await.unwrap();
        auth.register("taiko", "sticks123", "AC-002").await.unwrap();

        let err = auth.change_username(42, "taiko").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = auth.change_username(42, "").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        auth.change_username(42, "don").await.unwrap();
        assert!(auth.login("don", "sticks123").await.is_ok());
    }

    #[tokio::test]
    async fn test_change_password() {
        let auth = service();
        auth.register("drummer", "sticks123", "AC-001").await.unwrap();

        let err = auth.change_password(42, "wrong", "bachi2024").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), WRONG_PASSWORD_MESSAGE);

        let err = auth.change_password(42, "sticks123", "short").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        auth.change_password(42, "sticks123", "bachi2024").await.unwrap();
        assert!(auth.login("drummer", "sticks123").await.is_err());
        assert!(auth.login("drummer", "bachi2024").await.is_ok());

        let err = auth.change_password(99, "x", "bachi2024").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_passwords_too_long_for_bcrypt() {
        let auth = service();
        let prefix = "a".repeat(72);

        let err = auth
            .register("drummer", &format!("{}correct", prefix), "AC-001")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), PASSWORD_TOO_LONG_MESSAGE);

        auth.register("drummer", "sticks123", "AC-001").await.unwrap();

        // within the 100 character rule, but past what bcrypt reads
        let err = auth
            .change_password(42, "sticks123", &"b".repeat(90))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), NEW_PASSWORD_TOO_LONG_MESSAGE);

        let err = auth.login("drummer", &format!("{}WRONG", prefix)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
