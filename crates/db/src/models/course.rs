//! Course entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::lesson::Lesson;
use crate::models::section::Section;

/// Course difficulty levels accepted by `courses.level`.
pub const COURSE_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

/// Full course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub level: String,
    pub price: f64,
    pub category: String,
    pub prerequisites: String,
    pub thumbnail_public_id: Option<String>,
    pub thumbnail_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the transactional course + sections + lessons creation.
#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    #[serde(default = "default_level")]
    pub level: String,
    pub price: f64,
    pub category: String,
    #[serde(default = "default_prerequisites")]
    pub prerequisites: String,
    #[serde(default)]
    pub sections: Vec<CreateCourseSection>,
}

fn default_level() -> String {
    "beginner".to_string()
}

fn default_prerequisites() -> String {
    "None".to_string()
}

/// A section authored as part of course creation.
#[derive(Debug, Deserialize)]
pub struct CreateCourseSection {
    pub title: String,
    pub description: String,
    pub position: i32,
    #[serde(default)]
    pub lessons: Vec<CreateCourseLesson>,
}

/// A lesson authored as part of course creation.
#[derive(Debug, Deserialize)]
pub struct CreateCourseLesson {
    pub title: String,
    /// Falls back to the column's placeholder default when absent.
    pub video_url: Option<String>,
    pub position: i32,
    pub duration: String,
}

/// DTO for partial course updates. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub prerequisites: Option<String>,
}

/// A course with its sections and their lessons, in authoring order.
#[derive(Debug, Serialize)]
pub struct CourseWithContent {
    #[serde(flatten)]
    pub course: Course,
    pub sections: Vec<SectionWithLessons>,
}

/// A section with its lessons, in authoring order.
#[derive(Debug, Serialize)]
pub struct SectionWithLessons {
    #[serde(flatten)]
    pub section: Section,
    pub lessons: Vec<Lesson>,
}
