//! Collection of general utility functions.
//!
//! Small, reusable helpers that do not belong to a specific domain module:
//! session token handling and default avatar generation.

pub mod avatar;
pub mod jwt;

/// Canonical form of an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
