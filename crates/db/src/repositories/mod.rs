//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod course_repo;
pub mod enrollment_repo;
pub mod feedback_repo;
pub mod lesson_repo;
pub mod section_repo;
pub mod user_repo;

pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use feedback_repo::FeedbackRepo;
pub use lesson_repo::LessonRepo;
pub use section_repo::SectionRepo;
pub use user_repo::UserRepo;
