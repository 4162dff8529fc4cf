//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where useful, a `Serialize` response shape safe for API output

pub mod course;
pub mod feedback;
pub mod lesson;
pub mod section;
pub mod user;
