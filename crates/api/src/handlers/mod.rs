pub mod courses;
pub mod users;
