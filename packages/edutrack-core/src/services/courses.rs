//! Course rules: open/closed state, the deletion guard, and the
//! enrolled-user projection.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::error::{DbError, Result};
use crate::models::{Course, CoursePatch, Entity, NewCourse, User};
use crate::store::Store;

/// Creates a course. Titles need not be unique.
pub fn create(store: &mut Store, new: NewCourse) -> &Course {
    let id = store.courses_mut().next_id();
    let course = store.courses_mut().insert(
        id,
        Course {
            id,
            title: new.title,
            description: new.description,
            is_open: new.is_open,
            created_at: Utc::now(),
        },
    );
    tracing::debug!(course_id = id, "Created course");
    course
}

/// Gets a course by id.
pub fn get(store: &Store, id: u64) -> Result<&Course> {
    store
        .courses()
        .get(id)
        .ok_or_else(|| DbError::not_found(Entity::Course, id))
}

/// Lists all courses in insertion order.
pub fn list(store: &Store) -> Vec<&Course> {
    store.courses().iter().collect()
}

/// Applies the fields present in `patch`.
pub fn update(store: &mut Store, id: u64, patch: CoursePatch) -> Result<&Course> {
    let course = store
        .courses_mut()
        .get_mut(id)
        .ok_or_else(|| DbError::not_found(Entity::Course, id))?;
    if let Some(title) = patch.title {
        course.title = title;
    }
    if let Some(description) = patch.description {
        course.description = description;
    }
    if let Some(is_open) = patch.is_open {
        course.is_open = is_open;
    }
    tracing::debug!(course_id = id, "Updated course");
    Ok(course)
}

/// Deletes a course that no enrollment references.
///
/// # Errors
/// - [`DbError::NotFound`] if the course does not exist
/// - [`DbError::Conflict`] if any enrollment references the course; the
///   store is left unchanged
pub fn delete(store: &mut Store, id: u64) -> Result<Course> {
    if !store.courses().contains(id) {
        return Err(DbError::not_found(Entity::Course, id));
    }
    if store.enrollments().iter().any(|e| e.course_id == id) {
        return Err(DbError::conflict(Entity::Course, id));
    }

    let course = store
        .courses_mut()
        .remove(id)
        .ok_or_else(|| DbError::not_found(Entity::Course, id))?;
    tracing::debug!(course_id = id, "Deleted course");
    Ok(course)
}

/// Closes a course to new enrollments. Idempotent.
///
/// Existing enrollments are unaffected.
pub fn close(store: &mut Store, id: u64) -> Result<&Course> {
    let course = store
        .courses_mut()
        .get_mut(id)
        .ok_or_else(|| DbError::not_found(Entity::Course, id))?;
    course.is_open = false;
    tracing::debug!(course_id = id, "Closed course");
    Ok(course)
}

/// Returns true only for an existing, open course.
pub fn is_open(store: &Store, id: u64) -> bool {
    store.courses().get(id).is_some_and(|course| course.is_open)
}

/// Returns the distinct users enrolled in a course, in ascending id order.
///
/// User ids that no longer resolve are skipped.
pub fn enrolled_users(store: &Store, id: u64) -> Result<Vec<&User>> {
    if !store.courses().contains(id) {
        return Err(DbError::not_found(Entity::Course, id));
    }

    let user_ids: BTreeSet<u64> = store
        .enrollments()
        .iter()
        .filter(|e| e.course_id == id)
        .map(|e| e.user_id)
        .collect();

    Ok(user_ids
        .into_iter()
        .filter_map(|user_id| store.users().get(user_id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Enrollment, NewUser};
    use crate::services::users;

    fn enrollment(id: u64, user_id: u64, course_id: u64) -> Enrollment {
        Enrollment {
            id,
            user_id,
            course_id,
            enrolled_date: chrono::Local::now().date_naive(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_allows_duplicate_titles() {
        let mut store = Store::new();
        let first = create(&mut store, NewCourse::new("Python Basics", "Again")).id;
        let second = create(&mut store, NewCourse::new("Python Basics", "Again")).id;
        assert_eq!((first, second), (2, 3));
        assert_eq!(list(&store).len(), 3);
    }

    #[test]
    fn test_update_applies_present_fields_only() {
        let mut store = Store::new();
        let patch = CoursePatch {
            title: Some("Advanced Python".to_string()),
            ..Default::default()
        };
        let course = update(&mut store, 1, patch).unwrap();
        assert_eq!(course.title, "Advanced Python");
        assert_eq!(course.description, "Learn Python");
        assert!(course.is_open);
    }

    #[test]
    fn test_update_missing() {
        let mut store = Store::new();
        assert_eq!(
            update(&mut store, 9, CoursePatch::default()).unwrap_err(),
            DbError::not_found(Entity::Course, 9)
        );
    }

    #[test]
    fn test_delete_guarded_by_enrollment() {
        let mut store = Store::new();
        assert_eq!(
            delete(&mut store, 1).unwrap_err(),
            DbError::conflict(Entity::Course, 1)
        );
        assert!(get(&store, 1).is_ok());
    }

    #[test]
    fn test_delete_unreferenced() {
        let mut store = Store::new();
        let id = create(&mut store, NewCourse::new("Rust", "Ownership")).id;
        assert_eq!(delete(&mut store, id).unwrap().title, "Rust");
        assert!(get(&store, id).is_err());
    }

    #[test]
    fn test_close_and_is_open() {
        let mut store = Store::new();
        assert!(is_open(&store, 1));
        assert!(!close(&mut store, 1).unwrap().is_open);
        assert!(!close(&mut store, 1).unwrap().is_open);
        assert!(!is_open(&store, 1));
        assert!(!is_open(&store, 77));
        assert!(close(&mut store, 77).is_err());
    }

    #[test]
    fn test_enrolled_users_deduplicates_and_skips_dangling() {
        let mut store = Store::new();
        let bob = users::create(&mut store, NewUser::new("Bob", "bob@example.com"))
            .unwrap()
            .id;

        // Duplicate pair and a reference to a user that no longer exists
        store.enrollments_mut().insert(2, enrollment(2, bob, 1));
        store.enrollments_mut().insert(3, enrollment(3, bob, 1));
        store.enrollments_mut().insert(4, enrollment(4, 50, 1));

        let names: Vec<&str> = enrolled_users(&store, 1)
            .unwrap()
            .into_iter()
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_enrolled_users_missing_course() {
        let store = Store::new();
        assert_eq!(
            enrolled_users(&store, 3).unwrap_err(),
            DbError::not_found(Entity::Course, 3)
        );
    }

    #[test]
    fn test_enrolled_users_empty_course() {
        let mut store = Store::new();
        let id = create(&mut store, NewCourse::new("Rust", "Ownership")).id;
        assert!(enrolled_users(&store, id).unwrap().is_empty());
    }
}
