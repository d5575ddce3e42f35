//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse request bodies, pull the pool, the session state and
//! (on protected routes) the authenticated account from request extensions,
//! and delegate to `auth::service`.

use crate::api::common::{ApiError, MessageResponse, extract_json, service_error_to_http};
use crate::auth::middleware::CurrentUser;
use crate::auth::models::*;
use crate::auth::service::{AuthService, AuthState};
use crate::database::models::UserProfile;
use axum::{
    extract::{Extension, Json, rejection::JsonRejection},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<AuthResponse>), ApiError> {
    let payload = extract_json(payload, None)?;
    let auth_service = AuthService::new(&pool, &auth);

    match auth_service.register(payload).await {
        Ok(response) => Ok((StatusCode::CREATED, ResponseJson(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ResponseJson<AuthResponse>, ApiError> {
    let payload = extract_json(payload, None)?;
    let auth_service = AuthService::new(&pool, &auth);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request (client-side token invalidation)
#[axum::debug_handler]
pub async fn logout() -> ResponseJson<MessageResponse> {
    // Tokens are stateless; the client drops its copy.
    ResponseJson(MessageResponse::new("Logged out successfully"))
}

/// Get the authenticated account, as loaded by `jwt_auth`
#[axum::debug_handler]
pub async fn me(Extension(current): Extension<CurrentUser>) -> ResponseJson<UserProfile> {
    ResponseJson(current.0)
}

/// Update whitelisted fields on the authenticated account
#[axum::debug_handler]
pub async fn update_me(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<ResponseJson<UserProfile>, ApiError> {
    let payload = extract_json(payload, Some("Invalid updates"))?;
    let auth_service = AuthService::new(&pool, &auth);

    auth_service
        .update_profile(current.id(), payload)
        .await
        .map(ResponseJson)
        .map_err(service_error_to_http)
}

/// Change the authenticated account's password
#[axum::debug_handler]
pub async fn update_password(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    let payload = extract_json(payload, None)?;
    let auth_service = AuthService::new(&pool, &auth);

    match auth_service.update_password(current.id(), payload).await {
        Ok(()) => Ok(ResponseJson(MessageResponse::new(
            "Password updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
