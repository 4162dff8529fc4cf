//! Repository for the `users` table.
//!
//! Emails are normalized to lowercase on every write and lookup so the
//! unique constraint is effectively case-insensitive.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateSocialUser, CreateUser, User, DEFAULT_AVATAR_URL};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, avatar_public_id, avatar_url, \
                        role, is_verified, provider, social_id, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new local (password) user, returning the created row.
    ///
    /// New local users start unverified with the default `user` role.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash)
             VALUES ($1, lower($2), $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Insert a new social-login user, returning the created row.
    ///
    /// Social users are created pre-verified with no password.
    pub async fn create_social(
        pool: &PgPool,
        input: &CreateSocialUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, provider, social_id, avatar_url, is_verified)
             VALUES ($1, lower($2), $3, $4, $5, true)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.provider)
            .bind(&input.social_id)
            .bind(input.avatar_url.as_deref().unwrap_or(DEFAULT_AVATAR_URL))
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = lower($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_verified` for the user with the given email.
    ///
    /// Returns `true` if a row was updated.
    pub async fn mark_verified(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_verified = true WHERE email = lower($1)")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update a user's display name. Returns the updated row, or `None` if
    /// no row with the given `id` exists.
    pub async fn update_name(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a user's avatar reference. Returns the updated row, or `None`
    /// if no row with the given `id` exists.
    pub async fn update_avatar(
        pool: &PgPool,
        id: DbId,
        public_id: &str,
        url: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET avatar_public_id = $2, avatar_url = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(public_id)
            .bind(url)
            .fetch_optional(pool)
            .await
    }
}
