//! Defines the HTTP routes specifically for authentication.
//!
//! Registration, login and logout are public; profile and password routes sit
//! behind the `jwt_auth` middleware. The router is nested under `/api/auth`.

use crate::auth::handlers::*;
use crate::auth::middleware::*;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route(
            "/me",
            get(me).put(update_me).layer(middleware::from_fn(jwt_auth)),
        )
        .route(
            "/password",
            put(update_password).layer(middleware::from_fn(jwt_auth)),
        )
}
