//! Enrollment rules.
//!
//! Creating an enrollment runs a short-circuit validation pipeline against
//! the other two rule sets:
//! 1. the user exists and is active
//! 2. the course exists and is open
//! 3. the (user, course) pair is not already enrolled
//!
//! The first failing check decides the error. Completion is a plain flag
//! that may be set and cleared freely.

use chrono::{Local, Utc};

use crate::error::{DbError, Result, Violation};
use crate::models::{Enrollment, EnrollmentDetails, EnrollmentPatch, Entity, NewEnrollment};
use crate::services::{courses, users};
use crate::store::Store;

/// Enrolls a user in a course.
///
/// # Errors
/// - [`Violation::UserNotActive`] if the user is missing or inactive
/// - [`Violation::CourseNotOpen`] if the course is missing or closed
/// - [`Violation::AlreadyEnrolled`] if the pair already exists
pub fn enroll(store: &mut Store, new: NewEnrollment) -> Result<&Enrollment> {
    if !users::is_active(store, new.user_id) {
        return Err(Violation::UserNotActive.into());
    }
    if !courses::is_open(store, new.course_id) {
        return Err(Violation::CourseNotOpen.into());
    }
    if store
        .enrollments()
        .iter()
        .any(|e| e.user_id == new.user_id && e.course_id == new.course_id)
    {
        return Err(Violation::AlreadyEnrolled.into());
    }

    let id = store.enrollments_mut().next_id();
    let enrollment = store.enrollments_mut().insert(
        id,
        Enrollment {
            id,
            user_id: new.user_id,
            course_id: new.course_id,
            enrolled_date: new
                .enrolled_date
                .unwrap_or_else(|| Local::now().date_naive()),
            completed: false,
            created_at: Utc::now(),
        },
    );
    tracing::debug!(
        enrollment_id = id,
        user_id = new.user_id,
        course_id = new.course_id,
        "Enrolled user"
    );
    Ok(enrollment)
}

/// Gets an enrollment by id.
pub fn get(store: &Store, id: u64) -> Result<&Enrollment> {
    store
        .enrollments()
        .get(id)
        .ok_or_else(|| DbError::not_found(Entity::Enrollment, id))
}

/// Lists all enrollments in insertion order.
pub fn list(store: &Store) -> Vec<&Enrollment> {
    store.enrollments().iter().collect()
}

/// Applies `patch.completed` when present; an empty patch is a no-op.
pub fn update(store: &mut Store, id: u64, patch: EnrollmentPatch) -> Result<&Enrollment> {
    let enrollment = store
        .enrollments_mut()
        .get_mut(id)
        .ok_or_else(|| DbError::not_found(Entity::Enrollment, id))?;
    if let Some(completed) = patch.completed {
        enrollment.completed = completed;
    }
    tracing::debug!(enrollment_id = id, "Updated enrollment");
    Ok(enrollment)
}

/// Sets the completion flag.
///
/// Same effect as [`update`] with `completed: Some(completed)`.
pub fn mark_completion(store: &mut Store, id: u64, completed: bool) -> Result<&Enrollment> {
    update(
        store,
        id,
        EnrollmentPatch {
            completed: Some(completed),
        },
    )
}

/// Deletes an enrollment. Nothing references enrollments, so there is no
/// guard.
pub fn delete(store: &mut Store, id: u64) -> Result<Enrollment> {
    let enrollment = store
        .enrollments_mut()
        .remove(id)
        .ok_or_else(|| DbError::not_found(Entity::Enrollment, id))?;
    tracing::debug!(enrollment_id = id, "Deleted enrollment");
    Ok(enrollment)
}

/// Lists a user's enrollments joined with user name and course title.
pub fn enrollments_for_user(store: &Store, user_id: u64) -> Result<Vec<EnrollmentDetails>> {
    if !store.users().contains(user_id) {
        return Err(DbError::not_found(Entity::User, user_id));
    }
    Ok(store
        .enrollments()
        .iter()
        .filter(|e| e.user_id == user_id)
        .filter_map(|e| with_details(store, e))
        .collect())
}

/// Lists a course's enrollments joined with user name and course title.
pub fn enrollments_for_course(store: &Store, course_id: u64) -> Result<Vec<EnrollmentDetails>> {
    if !store.courses().contains(course_id) {
        return Err(DbError::not_found(Entity::Course, course_id));
    }
    Ok(store
        .enrollments()
        .iter()
        .filter(|e| e.course_id == course_id)
        .filter_map(|e| with_details(store, e))
        .collect())
}

/// Joins in the user name and course title.
///
/// Returns `None` when either reference no longer resolves.
fn with_details(store: &Store, enrollment: &Enrollment) -> Option<EnrollmentDetails> {
    let user = store.users().get(enrollment.user_id);
    let course = store.courses().get(enrollment.course_id);
    match (user, course) {
        (Some(user), Some(course)) => Some(EnrollmentDetails {
            enrollment: enrollment.clone(),
            user_name: user.name.clone(),
            course_title: course.title.clone(),
        }),
        _ => {
            tracing::warn!(
                enrollment_id = enrollment.id,
                user_id = enrollment.user_id,
                course_id = enrollment.course_id,
                "Skipping enrollment with dangling reference"
            );
            None
        }
    }
}
