//! Shared harness for HTTP integration tests.
//!
//! Builds the full application router with the production middleware stack,
//! an in-memory OTP store, and no mailer or media storage, so tests need
//! only the Postgres pool that `#[sqlx::test]` provides.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use lms_api::auth::jwt::JwtConfig;
use lms_api::auth::otp::OtpService;
use lms_api::config::ServerConfig;
use lms_api::router::build_app_router;
use lms_api::state::AppState;
use lms_cache::MemoryKv;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_expiry_secs: 3600,
        },
    }
}

/// Build the shared application state for tests.
///
/// The OTP store is in-memory and reachable through `state.otp`, so a test
/// can mint a code the app will accept. Mail and media storage are left
/// unconfigured.
pub fn test_state(pool: PgPool) -> AppState {
    let otp = OtpService::new(Arc::new(MemoryKv::new()));
    AppState::new(pool, test_config(), otp, None, None)
}

/// Build the full application router from a state handle.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn app_from_state(state: AppState) -> Router {
    let config = state.config.clone();
    build_app_router(state, &config)
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    app_from_state(test_state(pool))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST with a `Cookie` header, for the refresh-token endpoint.
pub async fn post_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Pull the `refresh_token` cookie pair (`name=value`) out of a response's
/// `Set-Cookie` header, if present.
pub fn refresh_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .filter(|pair| pair.starts_with("refresh_token="))
        .map(|pair| pair.to_string())
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Register a user through the API and return `(access_token, user json)`.
pub async fn register_user(
    app: Router,
    name: &str,
    email: &str,
    password: &str,
) -> (String, serde_json::Value) {
    let body = serde_json::json!({ "name": name, "email": email, "password": password });
    let response = post_json(app, "/api/v1/users/register", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    (token, json["user"].clone())
}

/// Promote a user to admin directly in the database.
pub async fn promote_to_admin(pool: &PgPool, user_id: i64) {
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("role update should succeed");
}
