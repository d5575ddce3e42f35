//! JWT session token utilities.
//!
//! The [`JwtManager`] is built once from [`Config`] at startup and handed to
//! handlers and middleware through request extensions. Tokens carry only the
//! account id and are never persisted server-side.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::ServiceError;

/// Session token claims.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Account ID
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtManager {
    pub fn new(secret: &str, expires_in_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtManager {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expires_in_seconds,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expires_in_seconds)
    }

    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }

    /// Generate a new session token for the given account.
    ///
    /// Fails with `InternalError` when the configured lifetime does not fit
    /// in a timestamp.
    pub fn generate_token(&self, user_id: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = i64::try_from(self.expires_in_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                ServiceError::internal_error(format!(
                    "Token lifetime of {} seconds is out of range",
                    self.expires_in_seconds
                ))
            })?;

        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a session token.
    ///
    /// Expired tokens and tokens that fail verification are both
    /// `Unauthorized`, with distinct messages.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::unauthorized("Token has expired"),
                _ => ServiceError::unauthorized("Token is not valid"),
            })
    }
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
