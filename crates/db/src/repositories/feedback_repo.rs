//! Repository for the `feedback` table.

use std::collections::HashMap;

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::feedback::{CreateFeedback, Feedback, FeedbackWithReplies};

const COLUMNS: &str = "id, rating, content, user_id, course_id, parent_id, \
                        created_at, updated_at";

pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert feedback authored by `user_id` on `course_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        input: &CreateFeedback,
    ) -> Result<Feedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback (rating, content, user_id, course_id, parent_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(input.rating)
            .bind(&input.content)
            .bind(user_id)
            .bind(course_id)
            .bind(input.parent_id)
            .fetch_one(pool)
            .await
    }

    /// Find a feedback row by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback WHERE id = $1");
        sqlx::query_as::<_, Feedback>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a course's top-level feedback (oldest first), each with its
    /// direct replies attached.
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<FeedbackWithReplies>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback WHERE course_id = $1 ORDER BY created_at, id"
        );
        let rows: Vec<Feedback> = sqlx::query_as(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await?;

        let mut replies: HashMap<DbId, Vec<Feedback>> = HashMap::new();
        let mut top_level = Vec::new();
        for row in rows {
            match row.parent_id {
                Some(parent) => replies.entry(parent).or_default().push(row),
                None => top_level.push(row),
            }
        }

        Ok(top_level
            .into_iter()
            .map(|feedback| FeedbackWithReplies {
                replies: replies.remove(&feedback.id).unwrap_or_default(),
                feedback,
            })
            .collect())
    }
}
