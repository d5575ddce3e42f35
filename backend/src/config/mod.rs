//! Central module for application-wide configuration settings.
//!
//! This module handles loading configuration parameters such as the database
//! URL, pool sizing, session token secrets and lifetime, password hashing cost,
//! server port and the allowed browser origin.

use anyhow::{Context, Result, ensure};
use std::env;

/// Seven days, the lifetime of a session token unless overridden.
const DEFAULT_JWT_EXPIRES_IN_SECONDS: &str = "604800";

/// Ten years. Longer lifetimes overflow token timestamps or are mistakes.
pub const MAX_JWT_EXPIRES_IN_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub bcrypt_cost: u32,
    pub server_port: u16,
    pub cors_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;
        ensure!(!jwt_secret.trim().is_empty(), "JWT_SECRET must not be empty");

        let jwt_expires_in_seconds = env::var("JWT_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| DEFAULT_JWT_EXPIRES_IN_SECONDS.to_string())
            .parse::<u64>()
            .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;
        check_jwt_expires_in(jwt_expires_in_seconds)?;

        let bcrypt_cost = env::var("BCRYPT_COST")
            .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
            .parse::<u32>()
            .context("BCRYPT_COST must be a valid number")?;
        ensure!(
            (4..=31).contains(&bcrypt_cost),
            "BCRYPT_COST must be between 4 and 31"
        );

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let cors_origin = env::var("CORS_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in_seconds,
            bcrypt_cost,
            server_port,
            cors_origin,
        })
    }
}

/// Rejects session lifetimes of zero or beyond [`MAX_JWT_EXPIRES_IN_SECONDS`].
fn check_jwt_expires_in(seconds: u64) -> Result<()> {
    ensure!(
        (1..=MAX_JWT_EXPIRES_IN_SECONDS).contains(&seconds),
        "JWT_EXPIRES_IN_SECONDS must be between 1 and {}",
        MAX_JWT_EXPIRES_IN_SECONDS
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_expiry_bounds() {
        assert!(check_jwt_expires_in(604800).is_ok());
        assert!(check_jwt_expires_in(MAX_JWT_EXPIRES_IN_SECONDS).is_ok());
        assert!(check_jwt_expires_in(0).is_err());
        assert!(check_jwt_expires_in(MAX_JWT_EXPIRES_IN_SECONDS + 1).is_err());
        assert!(check_jwt_expires_in(10_000_000_000_000_000).is_err());
        assert!(check_jwt_expires_in(u64::MAX).is_err());
    }
}
