//! Repository for the `courses` table, including the transactional
//! course + sections + lessons creation.

use std::collections::HashMap;

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{
    Course, CourseWithContent, CreateCourse, SectionWithLessons, UpdateCourse,
};
use crate::models::lesson::Lesson;
use crate::models::section::Section;
use crate::repositories::{LessonRepo, SectionRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, level, price, category, prerequisites, \
                        thumbnail_public_id, thumbnail_url, created_at, updated_at";

/// Provides CRUD operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Create a course together with its sections and lessons as one unit
    /// of work.
    ///
    /// All writes run on a single transaction: the course row is inserted
    /// first, then each input section in authoring order (RETURNING its id),
    /// then that section's lessons batch-inserted stamped with the returned
    /// id. Any error propagates before `commit`, and dropping the open
    /// transaction rolls everything back -- course, sections, and lessons
    /// all appear or none do.
    ///
    /// The committed content is re-read in nested form for the response.
    pub async fn create_with_content(
        pool: &PgPool,
        input: &CreateCourse,
    ) -> Result<CourseWithContent, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_course = format!(
            "INSERT INTO courses (title, description, level, price, category, prerequisites)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let course: Course = sqlx::query_as(&insert_course)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.level)
            .bind(input.price)
            .bind(&input.category)
            .bind(&input.prerequisites)
            .fetch_one(&mut *tx)
            .await?;

        for section_input in &input.sections {
            let section: Section = sqlx::query_as(
                "INSERT INTO sections (title, description, position, course_id)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, title, description, position, course_id, created_at, updated_at",
            )
            .bind(&section_input.title)
            .bind(&section_input.description)
            .bind(section_input.position)
            .bind(course.id)
            .fetch_one(&mut *tx)
            .await?;

            if section_input.lessons.is_empty() {
                continue;
            }

            // Batch-insert this section's lessons via UNNEST, every row
            // stamped with the freshly returned section id.
            let mut titles = Vec::with_capacity(section_input.lessons.len());
            let mut video_urls = Vec::with_capacity(section_input.lessons.len());
            let mut positions = Vec::with_capacity(section_input.lessons.len());
            let mut durations = Vec::with_capacity(section_input.lessons.len());
            for lesson in &section_input.lessons {
                titles.push(lesson.title.clone());
                video_urls.push(lesson.video_url.clone());
                positions.push(lesson.position);
                durations.push(lesson.duration.clone());
            }

            sqlx::query(
                "INSERT INTO lessons (title, video_url, position, duration, section_id)
                 SELECT t.title,
                        COALESCE(t.video_url, 'https://cdn.lms.local/defaults/video-placeholder.mp4'),
                        t.position, t.duration, $5
                 FROM UNNEST($1::text[], $2::text[], $3::int[], $4::text[])
                      AS t(title, video_url, position, duration)",
            )
            .bind(&titles)
            .bind(&video_urls)
            .bind(&positions)
            .bind(&durations)
            .bind(section.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        // Re-read with sections and lessons populated for the response.
        Self::find_with_content(pool, course.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a course by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a course with its sections and lessons nested in authoring order.
    pub async fn find_with_content(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CourseWithContent>, sqlx::Error> {
        let Some(course) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let sections = SectionRepo::list_by_course(pool, course.id).await?;
        let section_ids: Vec<DbId> = sections.iter().map(|s| s.id).collect();
        let lessons = LessonRepo::list_by_section_ids(pool, &section_ids).await?;

        let mut by_section: HashMap<DbId, Vec<Lesson>> = HashMap::new();
        for lesson in lessons {
            by_section.entry(lesson.section_id).or_default().push(lesson);
        }

        let sections = sections
            .into_iter()
            .map(|section| SectionWithLessons {
                lessons: by_section.remove(&section.id).unwrap_or_default(),
                section,
            })
            .collect();

        Ok(Some(CourseWithContent { course, sections }))
    }

    /// List all courses, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses ORDER BY created_at DESC");
        sqlx::query_as::<_, Course>(&query).fetch_all(pool).await
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                level = COALESCE($4, level),
                price = COALESCE($5, price),
                category = COALESCE($6, category),
                prerequisites = COALESCE($7, prerequisites)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.level)
            .bind(input.price)
            .bind(&input.category)
            .bind(&input.prerequisites)
            .fetch_optional(pool)
            .await
    }

    /// Replace a course's thumbnail reference. Returns the updated row, or
    /// `None` if no row with the given `id` exists.
    pub async fn set_thumbnail(
        pool: &PgPool,
        id: DbId,
        public_id: &str,
        url: &str,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET thumbnail_public_id = $2, thumbnail_url = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(public_id)
            .bind(url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course; sections and lessons cascade.
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
