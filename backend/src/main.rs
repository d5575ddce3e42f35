//! Main entry point for the entertainment app's authentication backend.
//!
//! This file initializes tracing, loads configuration, opens the database,
//! builds the session token manager once, and serves the Axum router with
//! CORS and request tracing layers until a shutdown signal arrives.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use anyhow::{Context, Result};
use auth::service::AuthState;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    response::Json,
    routing::get,
};
use config::Config;
use database::Database;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    let auth_state = AuthState::from_config(&config);

    info!(
        "Session tokens expire after {} seconds",
        auth_state.jwt.expires_in_seconds()
    );

    let app = build_router(db.pool().clone(), auth_state)
        .layer(cors_layer(config.cors_origin.as_deref())?)
        .layer(TraceLayer::new_for_http());

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("Starting auth server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    Ok(())
}

/// Route tree with the shared pool and session state attached.
pub(crate) fn build_router(pool: SqlitePool, auth_state: AuthState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::routes::auth_router())
        .layer(Extension(pool))
        .layer(Extension(auth_state))
}

/// Browser access policy. Without a configured origin every origin is allowed.
fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let Some(origin) = origin else {
        return Ok(CorsLayer::permissive());
    };

    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("CORS_ORIGIN is not a valid header value: {}", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": "Entertainment Auth Backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
