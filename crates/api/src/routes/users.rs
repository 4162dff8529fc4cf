//! Route definitions for the `/users` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{courses, users};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST  /register       -> register
/// POST  /login          -> login
/// POST  /verify-otp     -> verify_otp
/// POST  /resend-otp     -> resend_otp
/// POST  /refresh-token  -> refresh_token (cookie)
/// POST  /logout         -> logout (clears the cookie)
/// POST  /social         -> social_auth
/// GET   /profile        -> get_profile (auth)
/// PATCH /profile        -> update_profile (auth)
/// PATCH /password       -> update_password (auth)
/// PATCH /avatar         -> update_avatar (auth, multipart)
/// GET   /courses        -> my_courses (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/verify-otp", post(users::verify_otp))
        .route("/resend-otp", post(users::resend_otp))
        .route("/refresh-token", post(users::refresh_token))
        .route("/logout", post(users::logout))
        .route("/social", post(users::social_auth))
        .route(
            "/profile",
            get(users::get_profile).patch(users::update_profile),
        )
        .route("/password", patch(users::update_password))
        .route("/avatar", patch(users::update_avatar))
        .route("/courses", get(courses::my_courses))
}
