//! Lesson entity model.
//!
//! Lessons are only ever created as part of the course-creation
//! transaction; there is no standalone create DTO.

use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full lesson row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub title: String,
    pub video_url: String,
    pub position: i32,
    pub duration: String,
    pub section_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
