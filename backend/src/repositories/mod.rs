//! Persistence layer: one repository per stored entity.

pub mod user_repository;
