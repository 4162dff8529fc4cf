//! User entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Placeholder avatar; must match the `users.avatar_url` column default.
pub const DEFAULT_AVATAR_URL: &str = "https://cdn.lms.local/defaults/avatar.png";

/// Full user row from the `users` table.
///
/// Contains the password hash and social id -- NEVER serialize this to API
/// responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    /// `None` for social-only accounts.
    pub password_hash: Option<String>,
    pub avatar_public_id: Option<String>,
    pub avatar_url: String,
    pub role: String,
    pub is_verified: bool,
    /// `local`, `google`, or `facebook`.
    pub provider: String,
    pub social_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub role: String,
    pub is_verified: bool,
    pub provider: String,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            role: user.role,
            is_verified: user.is_verified,
            provider: user.provider,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a local (password) user.
#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// DTO for creating a pre-verified social-login user.
#[derive(Debug, Deserialize)]
pub struct CreateSocialUser {
    pub name: String,
    pub email: String,
    /// `google` or `facebook`.
    pub provider: String,
    pub social_id: String,
    /// Profile picture URL supplied by the provider, if any.
    pub avatar_url: Option<String>,
}
