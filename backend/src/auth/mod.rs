//! Authentication module for managing accounts, sessions, and access control.
//!
//! This module provides the public interface for registration, login, profile
//! and password self-service, token issuance, and the authorization middleware.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
