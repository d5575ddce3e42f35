//! Business logic layer sitting between the HTTP handlers and the repositories.

pub mod user_service;
