//! HTTP-level integration tests for profile, password, and avatar
//! management.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_json, get_auth, patch_json_auth, post_json};
use sqlx::PgPool;
use tower::ServiceExt;

/// GET /profile returns the caller's safe representation.
#[sqlx::test(migrations = "../db/migrations")]
async fn get_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user) =
        common::register_user(app.clone(), "Ada", "ada@example.com", "correct-password").await;

    let response = get_auth(app, "/api/v1/users/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], user["id"]);
    assert_eq!(json["email"], "ada@example.com");
    assert!(json.get("password_hash").is_none());
}

/// Profile routes require a valid Bearer token.
#[sqlx::test(migrations = "../db/migrations")]
async fn profile_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let missing = common::get(app.clone(), "/api/v1/users/profile").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = get_auth(app, "/api/v1/users/profile", "not-a-jwt").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

/// PATCH /profile renames the caller; an empty name is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_profile_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _user) =
        common::register_user(app.clone(), "Ada", "ada@example.com", "correct-password").await;

    let response = patch_json_auth(
        app.clone(),
        "/api/v1/users/profile",
        serde_json::json!({ "name": "Ada Lovelace" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Ada Lovelace");

    let empty = patch_json_auth(
        app,
        "/api/v1/users/profile",
        serde_json::json!({ "name": "   " }),
        &token,
    )
    .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
}

/// Password change: the old password stops working, the new one logs in.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_password_flow(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _user) =
        common::register_user(app.clone(), "Ada", "ada@example.com", "old-password-1").await;

    let response = patch_json_auth(
        app.clone(),
        "/api/v1/users/password",
        serde_json::json!({ "old_password": "old-password-1", "new_password": "new-password-2" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let old_login = post_json(
        app.clone(),
        "/api/v1/users/login",
        serde_json::json!({ "email": "ada@example.com", "password": "old-password-1" }),
    )
    .await;
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    let new_login = post_json(
        app,
        "/api/v1/users/login",
        serde_json::json!({ "email": "ada@example.com", "password": "new-password-2" }),
    )
    .await;
    assert_eq!(new_login.status(), StatusCode::OK);
}

/// A wrong current password is 401 and changes nothing.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_password_wrong_old(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _user) =
        common::register_user(app.clone(), "Ada", "ada@example.com", "old-password-1").await;

    let response = patch_json_auth(
        app.clone(),
        "/api/v1/users/password",
        serde_json::json!({ "old_password": "not-it", "new_password": "new-password-2" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let login = post_json(
        app,
        "/api/v1/users/login",
        serde_json::json!({ "email": "ada@example.com", "password": "old-password-1" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

/// Avatar upload without a configured media store is 502, leaving the
/// placeholder avatar untouched.
#[sqlx::test(migrations = "../db/migrations")]
async fn avatar_upload_without_storage_is_bad_gateway(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _user) =
        common::register_user(app.clone(), "Ada", "ada@example.com", "correct-password").await;

    let request = Request::builder()
        .method("PATCH")
        .uri("/api/v1/users/avatar")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=XBOUNDARY",
        )
        .body(Body::from("--XBOUNDARY--\r\n"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let profile = get_auth(app, "/api/v1/users/profile", &token).await;
    let json = body_json(profile).await;
    assert!(json["avatar_url"].as_str().unwrap().contains("avatar"));
}
