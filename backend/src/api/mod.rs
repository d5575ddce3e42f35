//! Shared API plumbing used by the route modules.
//!
//! Authentication routes live in `auth`; this module holds the common response
//! envelope and error conversion they rely on.

pub mod common;
