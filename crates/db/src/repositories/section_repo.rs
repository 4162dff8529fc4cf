//! Repository for the `sections` table.
//!
//! Sections are written only inside the course-creation transaction
//! (see `CourseRepo::create_with_content`); this repo covers reads.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::section::Section;

const COLUMNS: &str = "id, title, description, position, course_id, created_at, updated_at";

pub struct SectionRepo;

impl SectionRepo {
    /// List a course's sections in authoring order.
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sections WHERE course_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Count sections owned by a course.
    pub async fn count_by_course(pool: &PgPool, course_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sections WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(pool)
            .await
    }
}
