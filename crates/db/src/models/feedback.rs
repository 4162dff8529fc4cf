//! Feedback entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full feedback row from the `feedback` table.
///
/// A `parent_id` of `None` marks a top-level review/question; replies point
/// at their parent, forming a tree.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    /// 0-5, or `None` for replies and pure comments.
    pub rating: Option<i16>,
    pub content: String,
    pub user_id: DbId,
    pub course_id: DbId,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for posting feedback on a course.
#[derive(Debug, Deserialize)]
pub struct CreateFeedback {
    pub rating: Option<i16>,
    pub content: String,
    /// Present when replying to existing feedback on the same course.
    pub parent_id: Option<DbId>,
}

/// A top-level feedback entry with its direct replies.
#[derive(Debug, Serialize)]
pub struct FeedbackWithReplies {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub replies: Vec<Feedback>,
}
