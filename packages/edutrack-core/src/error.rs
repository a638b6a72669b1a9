//! Core error types.

use thiserror::Error;

use crate::models::Entity;

/// Result type for rule-set operations
pub type Result<T> = std::result::Result<T, DbError>;

/// Errors raised by the rule sets.
///
/// Every error is a deterministic function of the store state and the
/// request; none are transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// Referenced id does not exist in its collection
    #[error("{entity} not found")]
    NotFound { entity: Entity, id: u64 },

    /// Input or cross-entity precondition failed
    #[error("{0}")]
    Validation(#[from] Violation),

    /// Delete blocked by enrollments that still reference the record
    #[error("Cannot delete {} with existing enrollments", .entity.noun())]
    Conflict { entity: Entity, id: u64 },
}

impl DbError {
    /// Shorthand for a [`DbError::NotFound`].
    pub fn not_found(entity: Entity, id: u64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Shorthand for a [`DbError::Conflict`].
    pub fn conflict(entity: Entity, id: u64) -> Self {
        Self::Conflict { entity, id }
    }
}

/// Semantic validation failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Another user already holds the email address
    #[error("Email already exists")]
    DuplicateEmail,

    /// Enrollment references a missing or deactivated user
    #[error("User not found or not active")]
    UserNotActive,

    /// Enrollment references a missing or closed course
    #[error("Course not found or not open for enrollment")]
    CourseNotOpen,

    /// The (user, course) pair is already enrolled
    #[error("User is already enrolled in this course")]
    AlreadyEnrolled,
}
