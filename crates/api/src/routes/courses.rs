//! Route definitions for the `/courses` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::courses;
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /                -> list_courses
/// POST   /                -> create_course (admin)
/// GET    /{id}            -> get_course (nested sections + lessons)
/// PATCH  /{id}            -> update_course (admin)
/// DELETE /{id}            -> delete_course (admin)
/// PATCH  /{id}/thumbnail  -> upload_thumbnail (admin, multipart)
/// POST   /{id}/enroll     -> enroll (auth)
/// GET    /{id}/feedback   -> list_feedback (auth)
/// POST   /{id}/feedback   -> create_feedback (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_courses).post(courses::create_course))
        .route(
            "/{id}",
            get(courses::get_course)
                .patch(courses::update_course)
                .delete(courses::delete_course),
        )
        .route("/{id}/thumbnail", patch(courses::upload_thumbnail))
        .route("/{id}/enroll", post(courses::enroll))
        .route(
            "/{id}/feedback",
            get(courses::list_feedback).post(courses::create_feedback),
        )
}
