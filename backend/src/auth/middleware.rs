//! Middleware for protecting authenticated routes.
//!
//! Each request moves through: bearer token present, token verified, account
//! loaded. Any failed step ends the request with 401; on success the account's
//! public profile is attached to the request extensions as [`CurrentUser`].

use crate::api::common::{ApiError, error_response, service_error_to_http};
use crate::auth::service::AuthState;
use crate::database::models::UserProfile;
use crate::repositories::user_repository::UserRepository;
use axum::{
    extract::{Extension, Request},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// The authenticated account, inserted by [`jwt_auth`]. Carries no password hash.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }
}

/// JWT authentication middleware
pub async fn jwt_auth(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        error_response(StatusCode::UNAUTHORIZED, "No token, authorization denied")
    })?;

    let claims = auth
        .jwt
        .validate_token(token)
        .map_err(service_error_to_http)?;

    let user = UserRepository::new(&pool)
        .get_user_by_id(claims.user_id())
        .await
        .map_err(|e| {
            tracing::error!("Auth middleware error: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        })?
        .ok_or_else(|| {
            tracing::warn!("Valid token for missing user {}", claims.user_id());
            error_response(StatusCode::UNAUTHORIZED, "Token is not valid")
        })?;

    request.extensions_mut().insert(CurrentUser(user.into()));
    Ok(next.run(request).await)
}

/// Token from an `Authorization: Bearer <token>` header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Preferences, User};
    use axum::http::HeaderValue;
    use chrono::Utc;
    use sqlx::types::Json;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_current_user_drops_password_hash() {
        let now = Utc::now();
        let user = User {
            id: "user-1".to_string(),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
            profile_picture: None,
            bio: None,
            preferences: Json(Preferences::new()),
            created_at: now,
            updated_at: now,
        };

        let current = CurrentUser(user.into());
        assert_eq!(current.id(), "user-1");
        assert!(!format!("{current:?}").contains("$2b$"));
    }
}
