//! User business logic service.
//!
//! Handles account creation, credential checks, profile edits and password
//! changes. Token issuance is left to `auth::service`.

use crate::database::models::{CreateUser, UpdateUser, User};
use crate::errors::{ServiceError, ServiceResult, is_unique_violation};
use crate::repositories::user_repository::UserRepository;
use crate::utils::avatar::default_avatar_url;
use crate::utils::normalize_email;
use bcrypt::{hash, verify};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

/// Message for both unknown email and wrong password at login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration message. Reveals that the address is taken.
pub const USER_ALREADY_EXISTS: &str = "User already exists";

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    /// bcrypt work factor for new hashes
    hash_cost: u32,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    /// * `hash_cost` - bcrypt cost used when hashing passwords
    pub fn new(pool: &'a SqlitePool, hash_cost: u32) -> Self {
        Self { pool, hash_cost }
    }

    /// Creates a new account with a hashed password and a generated avatar.
    ///
    /// # Errors
    /// Returns `ServiceError::AlreadyExists` if the email is taken, including
    /// when a concurrent registration wins the UNIQUE constraint.
    pub async fn create_user(&self, name: &str, email: &str, password: &str) -> ServiceResult<User> {
        let email = normalize_email(email);
        let repo = UserRepository::new(self.pool);

        if repo.email_exists(&email).await? {
            return Err(ServiceError::already_exists(USER_ALREADY_EXISTS));
        }

        let password_hash = self.hash_password(password)?;

        let create_user = CreateUser {
            id: Uuid::now_v7().to_string(),
            name: name.trim().to_string(),
            email,
            password_hash,
            profile_picture: Some(default_avatar_url(name.trim())),
        };

        match repo.create_user(create_user).await {
            Ok(user) => {
                info!("Created user {}", user.id);
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => {
                Err(ServiceError::already_exists(USER_ALREADY_EXISTS))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checks an email/password pair.
    ///
    /// Unknown email and wrong password fail identically, and both pay for
    /// one bcrypt operation at the configured cost.
    pub async fn authenticate_user(&self, email: &str, password: &str) -> ServiceResult<User> {
        let email = normalize_email(email);
        let repo = UserRepository::new(self.pool);

        let user = repo.get_user_by_email(&email).await?;
        let password_hash = user.as_ref().map(|user| user.password_hash.as_str());

        if !self.check_credentials(password, password_hash)? {
            match &user {
                Some(user) => warn!("Login attempt with wrong password for user {}", user.id),
                None => warn!("Login attempt for unknown email"),
            }
            return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
        }

        user.ok_or_else(|| ServiceError::unauthorized(INVALID_CREDENTIALS))
    }

    /// Retrieves a user by ID, returning NotFound if absent.
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        UserRepository::new(self.pool)
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Applies a partial profile update to one account.
    ///
    /// # Errors
    /// - `AlreadyExists` if the new email belongs to another account
    /// - `NotFound` if the account no longer exists
    pub async fn update_profile(&self, id: &str, update: UpdateUser) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);

        if update.is_empty() {
            return self.get_user_required(id).await;
        }

        if let Some(email) = update.email.as_deref() {
            if repo.email_exists_excluding(email, id).await? {
                return Err(ServiceError::already_exists("Email is already in use"));
            }
        }

        match repo.update_user(id, update).await {
            Ok(Some(user)) => {
                info!("Updated profile for user {}", user.id);
                Ok(user)
            }
            Ok(None) => Err(ServiceError::not_found("User", id)),
            Err(e) if is_unique_violation(&e) => {
                Err(ServiceError::already_exists("Email is already in use"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the password after checking the current one.
    ///
    /// The stored hash is untouched unless `current_password` matches.
    pub async fn change_password(
        &self,
        id: &str,
        current_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(ServiceError::validation(
                "Current and new password are required",
            ));
        }
        if new_password.chars().count() < 6 {
            return Err(ServiceError::validation(
                "Password must be at least 6 characters",
            ));
        }

        let user = self.get_user_required(id).await?;

        if !self.verify_password(current_password, &user.password_hash)? {
            return Err(ServiceError::validation("Current password is incorrect"));
        }

        let password_hash = self.hash_password(new_password)?;
        let updated = UserRepository::new(self.pool)
            .update_password_hash(id, &password_hash)
            .await?;
        if !updated {
            return Err(ServiceError::not_found("User", id));
        }

        info!("Password changed for user {}", id);
        Ok(())
    }

    fn hash_password(&self, password: &str) -> ServiceResult<String> {
        hash(password, self.hash_cost)
            .map_err(|e| ServiceError::internal_error(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> ServiceResult<bool> {
        verify(password, password_hash)
            .map_err(|e| ServiceError::internal_error(format!("Failed to verify password: {}", e)))
    }

    /// Verifies `password` against the stored hash. Without an account the
    /// password is hashed anyway and the check fails.
    fn check_credentials(&self, password: &str, password_hash: Option<&str>) -> ServiceResult<bool> {
        match password_hash {
            Some(password_hash) => self.verify_password(password, password_hash),
            None => {
                self.hash_password(password)?;
                Ok(false)
            }
        }
    }
}
