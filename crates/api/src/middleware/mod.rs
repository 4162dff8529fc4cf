pub mod auth;
pub mod rbac;

pub use auth::AuthUser;
pub use rbac::RequireAdmin;
