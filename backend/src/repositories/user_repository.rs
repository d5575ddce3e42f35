//! Database repository for account persistence.
//!
//! Provides create, lookup and update operations for registered users.

use crate::database::models::{CreateUser, Preferences, UpdateUser, User};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;

const USER_COLUMNS: &str = "id, name, email, password_hash, profile_picture, bio, preferences, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `user` - CreateUser DTO containing user details
    ///
    /// # Returns
    /// The newly created User with all fields populated
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, profile_picture, bio, preferences, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, NULL, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(user.name)
            .bind(user.email)
            .bind(user.password_hash)
            .bind(user.profile_picture)
            .bind(Json(Preferences::new()))
            .bind(now)
            .bind(now)
            .fetch_one(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by their (normalized) email.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Checks if an email already exists in the system.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Checks if email exists excluding a specific user.
    ///
    /// # Arguments
    /// * `email` - Email to check
    /// * `exclude_user_id` - User ID to exclude from check
    pub async fn email_exists_excluding(&self, email: &str, exclude_user_id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id != ?")
                .bind(email)
                .bind(exclude_user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Applies every present field of `update` in a single statement.
    ///
    /// Nullable columns are written whenever their outer `Option` is set, so
    /// `Some(None)` clears them.
    ///
    /// # Returns
    /// The updated User, or `None` if no row has this id
    pub async fn update_user(&self, id: &str, update: UpdateUser) -> Result<Option<User>> {
        let query = format!(
            r#"
            UPDATE users SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                profile_picture = CASE WHEN ? THEN ? ELSE profile_picture END,
                bio = CASE WHEN ? THEN ? ELSE bio END,
                preferences = COALESCE(?, preferences),
                updated_at = ?
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(update.name)
            .bind(update.email)
            .bind(update.profile_picture.is_some())
            .bind(update.profile_picture.flatten())
            .bind(update.bio.is_some())
            .bind(update.bio.flatten())
            .bind(update.preferences.map(Json))
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Replaces the stored password hash.
    ///
    /// # Returns
    /// `true` if a row was updated
    pub async fn update_password_hash(&self, id: &str, password_hash: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(password_hash)
                .bind(Utc::now())
                .bind(id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
