//! Repository for the `lessons` table.
//!
//! Lessons are written only inside the course-creation transaction
//! (see `CourseRepo::create_with_content`); this repo covers reads.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::lesson::Lesson;

const COLUMNS: &str = "id, title, video_url, position, duration, section_id, \
                        created_at, updated_at";

pub struct LessonRepo;

impl LessonRepo {
    /// List the lessons of the given sections, in authoring order.
    pub async fn list_by_section_ids(
        pool: &PgPool,
        section_ids: &[DbId],
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        if section_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM lessons
             WHERE section_id = ANY($1)
             ORDER BY section_id, position, id"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(section_ids)
            .fetch_all(pool)
            .await
    }

    /// Count lessons across all sections of a course.
    pub async fn count_by_course(pool: &PgPool, course_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM lessons l
             JOIN sections s ON s.id = l.section_id
             WHERE s.course_id = $1",
        )
        .bind(course_id)
        .fetch_one(pool)
        .await
    }
}
