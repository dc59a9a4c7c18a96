//! Shared helpers for router-level tests
//!
//! Builds the full router over an in-memory store and drives it with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, Method, Request, StatusCode,
    },
    Router,
};
use profile_auth::backend::auth::{PasswordHasher, SessionCodec};
use profile_auth::backend::routes::create_router;
use profile_auth::backend::server::AppState;
use profile_auth::backend::store::MemoryIdentityStore;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-secret-test-secret-test-sec";

/// Cheapest bcrypt cost, keeps the suite fast
pub const TEST_HASH_COST: u32 = 4;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryIdentityStore>,
    pub codec: SessionCodec,
}

/// Router with AC-001 -> 42 and AC-002 -> 43 preloaded.
pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryIdentityStore::with_access_codes([
        ("AC-001", 42),
        ("AC-002", 43),
    ]));
    let codec = SessionCodec::with_default_ttl(TEST_SECRET);
    let state = AppState::new(store.clone(), PasswordHasher::new(TEST_HASH_COST), codec.clone());

    TestApp {
        router: create_router(state),
        store,
        codec,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers.get(SET_COOKIE).and_then(|v| v.to_str().ok())
    }

    /// Value of the "Authorization" cookie set by this response
    pub fn session_token(&self) -> Option<String> {
        let cookie = self.set_cookie()?;
        let pair = cookie.split(';').next()?;
        pair.strip_prefix("Authorization=").map(str::to_string)
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn register(&self, username: &str, password: &str, access_code: &str) -> TestResponse {
        let body = format!("username={}&password={}&accessCode={}", username, password, access_code);
        self.send(form_request("/register", &body, None)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.login_with_cookie(username, password, None).await
    }

    pub async fn login_with_cookie(&self, username: &str, password: &str, token: Option<&str>) -> TestResponse {
        let body = format!("username={}&password={}", username, password);
        self.send(form_request("/login", &body, token)).await
    }

    pub async fn session(&self, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, "/session", token, Body::empty())).await
    }

    pub async fn logout(&self, token: Option<&str>) -> TestResponse {
        self.send(request(Method::POST, "/logout", token, Body::empty())).await
    }

    pub async fn patch_json(&self, uri: &str, token: Option<&str>, body: serde_json::Value) -> TestResponse {
        let mut req = request(Method::PATCH, uri, token, Body::from(body.to_string()));
        req.headers_mut()
            .insert(CONTENT_TYPE, "application/json".parse().unwrap());
        self.send(req).await
    }

    /// Register and log in, returning the session token.
    pub async fn signed_in(&self, username: &str, password: &str, access_code: &str) -> String {
        assert_eq!(self.register(username, password, access_code).await.status, StatusCode::OK);
        let response = self.login(username, password).await;
        assert_eq!(response.status, StatusCode::OK);
        response.session_token().unwrap()
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(COOKIE, format!("Authorization={}", token));
    }
    builder.body(body).unwrap()
}

pub fn form_request(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut req = request(Method::POST, uri, token, Body::from(body.to_string()));
    req.headers_mut().insert(
        CONTENT_TYPE,
        "application/x-www-form-urlencoded".parse().unwrap(),
    );
    req
}
