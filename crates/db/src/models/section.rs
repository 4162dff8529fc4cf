//! Section entity model.
//!
//! Sections are only ever created as part of the course-creation
//! transaction; there is no standalone create DTO.

use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full section row from the `sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub position: i32,
    pub course_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
