//! Repository for the `enrollments` table.

use lms_core::types::DbId;
use sqlx::PgPool;

pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a user in a course. Re-enrolling is a no-op.
    ///
    /// Returns `true` if a new enrollment was created.
    pub async fn enroll(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO enrollments (user_id, course_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_enrollments_user_course DO NOTHING",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The ids of the courses a user is enrolled in, oldest first.
    pub async fn course_ids_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT course_id FROM enrollments WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
