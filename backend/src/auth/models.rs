//! Data structures for authentication requests and responses.
//!
//! Request payloads are validated with `validator` before they reach the
//! service layer. `UpdateProfileRequest` is the whitelist of client-editable
//! fields: any other key fails deserialization.

use crate::database::models::{Preferences, UpdateUser, UserProfile};
use crate::utils::normalize_email;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl RegisterRequest {
    /// Trims the name and canonicalizes the email. Run before `validate()`.
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn normalize(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self
    }
}

/// Response to a successful register or login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
    pub message: String,
}

/// Partial profile update. Absent fields are left unchanged; an explicit
/// `null` clears `profilePicture` or `bio`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Must be a valid email"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(url(message = "Profile picture must be a valid URL"))]
    pub profile_picture: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<Option<String>>,

    pub preferences: Option<Preferences>,
}

impl UpdateProfileRequest {
    /// Trims the name and canonicalizes the email. Run before `validate()`.
    pub fn normalize(mut self) -> Self {
        self.name = self.name.map(|name| name.trim().to_string());
        self.email = self.email.as_deref().map(normalize_email);
        self
    }
}

/// `Some(None)` for an explicit `null`, `None` (via `default`) for a missing key.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdateProfileRequest> for UpdateUser {
    fn from(request: UpdateProfileRequest) -> Self {
        UpdateUser {
            name: request.name,
            email: request.email,
            profile_picture: request.profile_picture,
            bio: request.bio,
            preferences: request.preferences,
        }
    }
}

/// Password change payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_accepts_whitelisted_fields() {
        let request: UpdateProfileRequest = serde_json::from_str(
            r#"{"name":"Alice","profilePicture":"https://img.example/a.png","bio":"Film buff","preferences":{"theme":"dark"}}"#,
        )
        .unwrap();

        assert_eq!(request.name.as_deref(), Some("Alice"));
        assert_eq!(
            request.profile_picture,
            Some(Some("https://img.example/a.png".to_string()))
        );
        assert_eq!(request.preferences.unwrap()["theme"], "dark");
        assert!(request.email.is_none());
    }

    #[test]
    fn test_update_profile_rejects_unknown_fields() {
        let result =
            serde_json::from_str::<UpdateProfileRequest>(r#"{"name":"Alice","password":"x"}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<UpdateProfileRequest>(r#"{"isAdmin":true}"#);
        assert!(result.is_err());

        // snake_case spelling is not on the whitelist either
        let result =
            serde_json::from_str::<UpdateProfileRequest>(r#"{"profile_picture":"https://a.b/c"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_profile_preferences_must_be_object() {
        let result = serde_json::from_str::<UpdateProfileRequest>(r#"{"preferences":[1,2]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_profile_validation() {
        let request = UpdateProfileRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateProfileRequest {
            bio: Some(Some("x".repeat(501))),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateProfileRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateProfileRequest {
            profile_picture: Some(Some("not a url".to_string())),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let cleared = UpdateProfileRequest {
            profile_picture: Some(None),
            bio: Some(None),
            ..Default::default()
        };
        assert!(cleared.validate().is_ok());

        assert!(UpdateProfileRequest::default().validate().is_ok());
    }

    #[test]
    fn test_update_profile_null_differs_from_absent() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"bio":null,"profilePicture":null}"#).unwrap();
        assert_eq!(request.bio, Some(None));
        assert_eq!(request.profile_picture, Some(None));

        let request: UpdateProfileRequest = serde_json::from_str(r#"{"name":"Alice"}"#).unwrap();
        assert_eq!(request.bio, None);
        assert_eq!(request.profile_picture, None);

        let update = UpdateUser::from(
            serde_json::from_str::<UpdateProfileRequest>(r#"{"bio":null}"#).unwrap(),
        );
        assert_eq!(update.bio, Some(None));
        assert!(!update.is_empty());
    }

    #[test]
    fn test_update_profile_normalizes_before_validation() {
        let request = UpdateProfileRequest {
            email: Some(" New@X.com ".to_string()),
            name: Some("  Alice  ".to_string()),
            ..Default::default()
        }
        .normalize();
        assert!(request.validate().is_ok());

        let update = UpdateUser::from(request);
        assert_eq!(update.email.as_deref(), Some("new@x.com"));
        assert_eq!(update.name.as_deref(), Some("Alice"));

        let blank = UpdateProfileRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        }
        .normalize();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_register_normalizes_before_validation() {
        let padded = RegisterRequest {
            name: " Alice ".to_string(),
            email: " A@X.com ".to_string(),
            password: "secret1".to_string(),
        }
        .normalize();
        assert!(padded.validate().is_ok());
        assert_eq!(padded.name, "Alice");
        assert_eq!(padded.email, "a@x.com");

        let blank = RegisterRequest {
            name: "   ".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        }
        .normalize();
        assert!(blank.validate().is_err());

        let login = LoginRequest {
            email: " A@X.com ".to_string(),
            password: "secret1".to_string(),
        }
        .normalize();
        assert_eq!(login.email, "a@x.com");
    }

    #[test]
    fn test_register_validation() {
        let valid = RegisterRequest {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = RegisterRequest {
            password: "abc".to_string(),
            ..valid
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_update_password_missing_fields_default_to_empty() {
        let request: UpdatePasswordRequest =
            serde_json::from_str(r#"{"currentPassword":"secret1"}"#).unwrap();
        assert_eq!(request.current_password, "secret1");
        assert!(request.new_password.is_empty());
    }
}
