pub mod courses;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/register            register (public)
/// /users/login               login (public)
/// /users/verify-otp          confirm verification code (public)
/// /users/resend-otp          re-issue verification code (public)
/// /users/refresh-token       refresh via cookie (public)
/// /users/social              social sign-in (public)
/// /users/profile             get, update profile (auth)
/// /users/password            change password (auth)
/// /users/avatar              upload avatar (auth, multipart)
/// /users/courses             enrolled course ids (auth)
///
/// /courses                   list (public), create (admin)
/// /courses/{id}              get (public), update, delete (admin)
/// /courses/{id}/thumbnail    upload thumbnail (admin, multipart)
/// /courses/{id}/enroll       enroll caller (auth)
/// /courses/{id}/feedback     list, post feedback (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/courses", courses::router())
}
