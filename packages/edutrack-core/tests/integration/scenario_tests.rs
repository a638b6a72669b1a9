//! Walkthrough of the seeded store across all three rule sets.

use edutrack_core::models::{CoursePatch, NewCourse, NewEnrollment, NewUser, UserPatch};
use edutrack_core::services::{courses, enrollments, users};
use edutrack_core::{DbError, Entity, Store, Violation};

#[test]
fn test_seed_scenario() -> anyhow::Result<()> {
    let mut store = Store::new();

    // Alice is already enrolled in Python Basics
    assert_eq!(
        enrollments::enroll(&mut store, NewEnrollment::new(1, 1)).unwrap_err(),
        DbError::Validation(Violation::AlreadyEnrolled)
    );

    // Closed course rejects a fresh active user
    courses::close(&mut store, 1)?;
    let bob = users::create(&mut store, NewUser::new("Bob", "bob@example.com"))?.id;
    assert_eq!(bob, 2);
    assert_eq!(
        enrollments::enroll(&mut store, NewEnrollment::new(bob, 1)).unwrap_err(),
        DbError::Validation(Violation::CourseNotOpen)
    );

    // Deactivated user is rejected even for an open course
    users::deactivate(&mut store, 1)?;
    let rust = courses::create(&mut store, NewCourse::new("Rust", "Ownership")).id;
    assert_eq!(rust, 2);
    assert_eq!(
        enrollments::enroll(&mut store, NewEnrollment::new(1, rust)).unwrap_err(),
        DbError::Validation(Violation::UserNotActive)
    );

    let completed = enrollments::mark_completion(&mut store, 1, true)?;
    assert_eq!(completed.id, 1);
    assert!(completed.completed);

    assert_eq!(
        users::delete(&mut store, 1).unwrap_err(),
        DbError::Conflict {
            entity: Entity::User,
            id: 1
        }
    );
    Ok(())
}

#[test]
fn test_full_lifecycle() -> anyhow::Result<()> {
    let mut store = Store::empty();

    let carol = users::create(&mut store, NewUser::new("Carol", "carol@example.com"))?.id;
    let course = courses::create(&mut store, NewCourse::new("Go", "Concurrency")).id;
    let enrollment = enrollments::enroll(&mut store, NewEnrollment::new(carol, course))?.id;
    assert_eq!((carol, course, enrollment), (1, 1, 1));

    let enrolled: Vec<u64> = courses::enrolled_users(&store, course)?
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(enrolled, vec![carol]);

    // Renames show up in detail projections
    users::update(
        &mut store,
        carol,
        UserPatch {
            name: Some("Caroline".to_string()),
            ..Default::default()
        },
    )?;
    courses::update(
        &mut store,
        course,
        CoursePatch {
            title: Some("Go in Depth".to_string()),
            ..Default::default()
        },
    )?;
    let details = enrollments::enrollments_for_course(&store, course)?;
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].user_name, "Caroline");
    assert_eq!(details[0].course_title, "Go in Depth");

    // Deletion guards release once the enrollment is gone
    assert!(courses::delete(&mut store, course).is_err());
    enrollments::delete(&mut store, enrollment)?;
    courses::delete(&mut store, course)?;
    users::delete(&mut store, carol)?;

    assert!(users::list(&store).is_empty());
    assert!(courses::list(&store).is_empty());
    assert!(enrollments::list(&store).is_empty());

    // Ids keep increasing after deletes
    let dave = users::create(&mut store, NewUser::new("Dave", "dave@example.com"))?.id;
    assert_eq!(dave, 2);
    Ok(())
}

#[test]
fn test_closing_course_keeps_existing_enrollments() -> anyhow::Result<()> {
    let mut store = Store::new();
    courses::close(&mut store, 1)?;

    let details = enrollments::enrollments_for_user(&store, 1)?;
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].course_title, "Python Basics");

    // Completion can still be toggled on the closed course
    assert!(enrollments::mark_completion(&mut store, 1, true)?.completed);
    assert!(!enrollments::mark_completion(&mut store, 1, false)?.completed);
    Ok(())
}

#[test]
fn test_enrolled_users_after_user_reactivation() -> anyhow::Result<()> {
    let mut store = Store::new();
    users::deactivate(&mut store, 1)?;

    // Inactive users still show up as enrolled
    let names: Vec<String> = courses::enrolled_users(&store, 1)?
        .into_iter()
        .map(|u| u.name.clone())
        .collect();
    assert_eq!(names, vec!["Alice".to_string()]);

    users::update(
        &mut store,
        1,
        UserPatch {
            is_active: Some(true),
            ..Default::default()
        },
    )?;
    let rust = courses::create(&mut store, NewCourse::new("Rust", "Ownership")).id;
    assert!(enrollments::enroll(&mut store, NewEnrollment::new(1, rust)).is_ok());
    Ok(())
}
