//! Core store and business rules for the EduTrack enrollment service.
//!
//! Provides the in-memory store for users, courses, and enrollments,
//! the rule sets that validate every mutation against it, and the
//! configuration shared with the HTTP layer.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod table;

pub use error::{DbError, Result, Violation};
pub use models::Entity;
pub use store::Store;
