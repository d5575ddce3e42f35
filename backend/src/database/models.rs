//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. The `User` row carries the password hash and is never
//! serialized; `UserProfile` is the shape handed to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use sqlx::types::Json;

/// Free-form client preferences, stored as a JSON document.
pub type Preferences = Map<String, Value>;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub preferences: Json<Preferences>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
}

/// Column-level partial update. `None` leaves the stored value untouched;
/// `Some(None)` on a nullable column stores NULL.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub preferences: Option<Preferences>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.profile_picture.is_none()
            && self.bio.is_none()
            && self.preferences.is_none()
    }
}

/// Account as returned to clients (password hash omitted).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            profile_picture: user.profile_picture,
            bio: user.bio,
            preferences: user.preferences.0,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
