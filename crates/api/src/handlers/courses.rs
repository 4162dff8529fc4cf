//! Handlers for the `/courses` resource (authoring, catalog, thumbnails,
//! enrollment, feedback).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_db::models::course::{
    Course, CourseWithContent, CreateCourse, UpdateCourse, COURSE_LEVELS,
};
use lms_db::models::feedback::{CreateFeedback, Feedback, FeedbackWithReplies};
use lms_db::repositories::{CourseRepo, EnrollmentRepo, FeedbackRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Course thumbnails are normalized to an 800x440 webp before upload.
const THUMBNAIL_WIDTH: u32 = 800;
const THUMBNAIL_HEIGHT: u32 = 440;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response for `POST /courses/{id}/enroll`.
#[derive(Debug, Serialize)]
pub struct EnrollResponse {
    pub course_id: DbId,
    /// `false` when the caller was already enrolled.
    pub enrolled: bool,
}

/// Response for `GET /users/courses`.
#[derive(Debug, Serialize)]
pub struct EnrolledCoursesResponse {
    pub course_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/courses
///
/// Create a course together with its sections and lessons in one shot.
/// The whole graph is written transactionally; a failure anywhere leaves
/// nothing behind.
pub async fn create_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<CourseWithContent>)> {
    validate_course_fields(&input.title, &input.level, input.price)?;
    for section in &input.sections {
        if section.title.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Section title must not be empty".into(),
            )));
        }
    }

    let course = CourseRepo::create_with_content(&state.pool, &input).await?;
    tracing::info!(
        course_id = course.course.id,
        sections = course.sections.len(),
        admin_id = admin.user_id,
        "Course created"
    );

    Ok((StatusCode::CREATED, Json(course)))
}

/// GET /api/v1/courses
pub async fn list_courses(State(state): State<AppState>) -> AppResult<Json<Vec<Course>>> {
    let courses = CourseRepo::list(&state.pool).await?;
    Ok(Json(courses))
}

/// GET /api/v1/courses/{id}
///
/// Returns the course with its sections and lessons nested in authoring
/// order.
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CourseWithContent>> {
    let course = CourseRepo::find_with_content(&state.pool, id)
        .await?
        .ok_or_else(|| course_not_found(id))?;
    Ok(Json(course))
}

/// PATCH /api/v1/courses/{id}
///
/// Partial update; absent fields keep their current values.
pub async fn update_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<Json<Course>> {
    if let Some(level) = input.level.as_deref() {
        validate_level(level)?;
    }
    if let Some(price) = input.price {
        validate_price(price)?;
    }

    let course = CourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| course_not_found(id))?;
    Ok(Json(course))
}

/// DELETE /api/v1/courses/{id}
///
/// Sections and lessons cascade. Returns 204 No Content.
pub async fn delete_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CourseRepo::delete(&state.pool, id).await? {
        return Err(course_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/courses/{id}/thumbnail (multipart)
///
/// Normalize the uploaded image to 800x440 webp, push it to the media
/// store, and persist the new reference. The previous asset is deleted
/// best-effort after the new one is in place.
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<Course>> {
    let storage = state.storage.clone().ok_or_else(|| {
        AppError::Core(CoreError::External("Media storage is not configured".into()))
    })?;

    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| course_not_found(id))?;

    let mut file_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            file_bytes = Some(bytes.to_vec());
        }
    }
    let file_bytes = file_bytes
        .ok_or_else(|| AppError::BadRequest("Missing `file` field in multipart body".into()))?;

    let processed = lms_media::resize_and_optimize(
        &file_bytes,
        THUMBNAIL_WIDTH,
        THUMBNAIL_HEIGHT,
        lms_media::OutputFormat::Webp,
        lms_media::ImageFit::Cover,
    )?;
    let asset = storage.upload(processed, "courses").await?;

    let old_public_id = course.thumbnail_public_id.clone();
    let updated = CourseRepo::set_thumbnail(&state.pool, id, &asset.public_id, &asset.url)
        .await?
        .ok_or_else(|| course_not_found(id))?;

    if let Some(public_id) = old_public_id {
        if let Err(e) = storage.delete(&public_id).await {
            tracing::warn!(public_id = %public_id, error = %e, "Failed to delete previous thumbnail");
        }
    }

    Ok(Json(updated))
}

/// POST /api/v1/courses/{id}/enroll
///
/// Enroll the caller in the course. Enrolling twice is a no-op reported in
/// the response.
pub async fn enroll(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<EnrollResponse>> {
    if CourseRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(course_not_found(id));
    }

    let enrolled = EnrollmentRepo::enroll(&state.pool, auth_user.user_id, id).await?;
    Ok(Json(EnrollResponse {
        course_id: id,
        enrolled,
    }))
}

/// GET /api/v1/users/courses
///
/// The ids of the courses the caller is enrolled in.
pub async fn my_courses(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<EnrolledCoursesResponse>> {
    let course_ids = EnrollmentRepo::course_ids_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(EnrolledCoursesResponse { course_ids }))
}

/// POST /api/v1/courses/{id}/feedback
///
/// Post a review, question, or reply on a course. A reply's parent must be
/// feedback on the same course.
pub async fn create_feedback(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateFeedback>,
) -> AppResult<(StatusCode, Json<Feedback>)> {
    if input.content.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Feedback content must not be empty".into(),
        )));
    }
    if let Some(rating) = input.rating {
        if !(0..=5).contains(&rating) {
            return Err(AppError::Core(CoreError::Validation(
                "Rating must be between 0 and 5".into(),
            )));
        }
    }

    if CourseRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(course_not_found(id));
    }

    if let Some(parent_id) = input.parent_id {
        let parent = FeedbackRepo::find_by_id(&state.pool, parent_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFoundMsg("Parent feedback not found".into()))
            })?;
        if parent.course_id != id {
            return Err(AppError::Core(CoreError::Validation(
                "Parent feedback belongs to a different course".into(),
            )));
        }
    }

    let feedback = FeedbackRepo::create(&state.pool, auth_user.user_id, id, &input).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// GET /api/v1/courses/{id}/feedback
pub async fn list_feedback(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<FeedbackWithReplies>>> {
    if CourseRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(course_not_found(id));
    }
    let feedback = FeedbackRepo::list_for_course(&state.pool, id).await?;
    Ok(Json(feedback))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn course_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Course",
        id,
    })
}

fn validate_course_fields(title: &str, level: &str, price: f64) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".into(),
        )));
    }
    validate_level(level)?;
    validate_price(price)?;
    Ok(())
}

fn validate_level(level: &str) -> Result<(), AppError> {
    if !COURSE_LEVELS.contains(&level) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Level must be one of: {}",
            COURSE_LEVELS.join(", ")
        ))));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Price must be a non-negative number".into(),
        )));
    }
    Ok(())
}
