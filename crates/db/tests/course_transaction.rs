//! Integration tests for the transactional course creation.
//!
//! The atomicity contract: a course, its sections, and their lessons all
//! appear together or not at all.

use lms_db::models::course::{CreateCourse, CreateCourseLesson, CreateCourseSection};
use lms_db::repositories::{CourseRepo, LessonRepo, SectionRepo};
use sqlx::PgPool;

fn lesson(title: &str, position: i32) -> CreateCourseLesson {
    CreateCourseLesson {
        title: title.to_string(),
        video_url: None,
        position,
        duration: "5m".to_string(),
    }
}

fn section(title: &str, position: i32, lessons: Vec<CreateCourseLesson>) -> CreateCourseSection {
    CreateCourseSection {
        title: title.to_string(),
        description: format!("{title} description"),
        position,
        lessons,
    }
}

fn course(sections: Vec<CreateCourseSection>) -> CreateCourse {
    CreateCourse {
        title: "Rust from the ground up".to_string(),
        description: "Ownership, borrowing, and fearless concurrency".to_string(),
        level: "beginner".to_string(),
        price: 49.99,
        category: "programming".to_string(),
        prerequisites: "None".to_string(),
        sections,
    }
}

#[sqlx::test]
async fn creates_course_with_nested_sections_and_lessons(pool: PgPool) {
    let input = course(vec![
        section("S1", 0, vec![lesson("L1", 0), lesson("L2", 1)]),
        section("S2", 1, vec![lesson("L3", 0)]),
        section("S3", 2, vec![]),
    ]);

    let created = CourseRepo::create_with_content(&pool, &input)
        .await
        .expect("transaction should commit");

    assert_eq!(created.course.title, "Rust from the ground up");
    assert_eq!(created.sections.len(), 3);

    // Sections come back in authoring order, stamped with the course id.
    for (i, s) in created.sections.iter().enumerate() {
        assert_eq!(s.section.position, i as i32);
        assert_eq!(s.section.course_id, created.course.id);
    }

    // Each lesson's section reference matches its input section.
    assert_eq!(created.sections[0].lessons.len(), 2);
    assert_eq!(created.sections[1].lessons.len(), 1);
    assert_eq!(created.sections[2].lessons.len(), 0);
    for s in &created.sections {
        for l in &s.lessons {
            assert_eq!(l.section_id, s.section.id);
        }
    }

    // Total counts: N sections, sum(Li) lessons.
    let section_count = SectionRepo::count_by_course(&pool, created.course.id)
        .await
        .unwrap();
    let lesson_count = LessonRepo::count_by_course(&pool, created.course.id)
        .await
        .unwrap();
    assert_eq!(section_count, 3);
    assert_eq!(lesson_count, 3);

    // Absent video URLs fall back to the placeholder default.
    assert!(created.sections[0].lessons[0].video_url.contains("placeholder"));
}

#[sqlx::test]
async fn failure_mid_transaction_rolls_back_everything(pool: PgPool) {
    // The second section's lesson violates the position check constraint,
    // which fires after the course and the first section were inserted.
    let input = course(vec![
        section("S1", 0, vec![lesson("L1", 0)]),
        section("S2", 1, vec![lesson("Broken", -1)]),
    ]);

    let err = CourseRepo::create_with_content(&pool, &input)
        .await
        .expect_err("constraint violation must fail the transaction");
    assert!(matches!(err, sqlx::Error::Database(_)));

    // Nothing persisted: no course, no sections, no lessons.
    let courses = CourseRepo::list(&pool).await.unwrap();
    assert!(courses.is_empty(), "course insert must have rolled back");

    let orphan_sections: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sections")
        .fetch_one(&pool)
        .await
        .unwrap();
    let orphan_lessons: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphan_sections, 0);
    assert_eq!(orphan_lessons, 0);
}

#[sqlx::test]
async fn update_delete_and_list(pool: PgPool) {
    let created = CourseRepo::create_with_content(&pool, &course(vec![section("S1", 0, vec![])]))
        .await
        .expect("create should succeed");
    let id = created.course.id;

    let updated = CourseRepo::update(
        &pool,
        id,
        &lms_db::models::course::UpdateCourse {
            title: Some("Advanced Rust".to_string()),
            description: None,
            level: Some("advanced".to_string()),
            price: None,
            category: None,
            prerequisites: None,
        },
    )
    .await
    .expect("update should succeed")
    .expect("course should exist");

    assert_eq!(updated.title, "Advanced Rust");
    assert_eq!(updated.level, "advanced");
    // Untouched fields survive the partial update.
    assert_eq!(updated.price, 49.99);

    assert_eq!(CourseRepo::list(&pool).await.unwrap().len(), 1);

    let deleted = CourseRepo::delete(&pool, id).await.unwrap();
    assert!(deleted);

    // Cascade removed the owned sections.
    let orphan_sections: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sections")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphan_sections, 0);
    assert!(CourseRepo::find_with_content(&pool, id).await.unwrap().is_none());
}
