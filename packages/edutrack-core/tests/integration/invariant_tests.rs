//! Property tests: store invariants hold after arbitrary operation sequences.

use std::collections::HashSet;

use proptest::prelude::*;

use edutrack_core::models::{EnrollmentPatch, NewCourse, NewEnrollment, NewUser, UserPatch};
use edutrack_core::services::{courses, enrollments, users};
use edutrack_core::{DbError, Store, Violation};

/// Small id and email pools so operations collide often.
#[derive(Debug, Clone)]
enum Op {
    CreateUser { email: u8, active: bool },
    UpdateEmail { user: u64, email: u8 },
    DeactivateUser(u64),
    DeleteUser(u64),
    CreateCourse { open: bool },
    CloseCourse(u64),
    DeleteCourse(u64),
    Enroll { user: u64, course: u64 },
    SetCompleted { enrollment: u64, completed: bool },
    DeleteEnrollment(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6, any::<bool>()).prop_map(|(email, active)| Op::CreateUser { email, active }),
        (1u64..8, 0u8..6).prop_map(|(user, email)| Op::UpdateEmail { user, email }),
        (1u64..8).prop_map(Op::DeactivateUser),
        (1u64..8).prop_map(Op::DeleteUser),
        any::<bool>().prop_map(|open| Op::CreateCourse { open }),
        (1u64..8).prop_map(Op::CloseCourse),
        (1u64..8).prop_map(Op::DeleteCourse),
        (1u64..8, 1u64..8).prop_map(|(user, course)| Op::Enroll { user, course }),
        (1u64..12, any::<bool>())
            .prop_map(|(enrollment, completed)| Op::SetCompleted { enrollment, completed }),
        (1u64..12).prop_map(Op::DeleteEnrollment),
    ]
}

fn email(n: u8) -> String {
    format!("user{n}@example.com")
}

/// Record counts used to detect partial mutations.
fn counts(store: &Store) -> (usize, usize, usize) {
    (
        store.users().record_count(),
        store.courses().record_count(),
        store.enrollments().record_count(),
    )
}

/// Expected outcome of an enroll request, checked in pipeline order.
fn expected_enroll(store: &Store, user: u64, course: u64) -> Option<Violation> {
    if !store.users().get(user).is_some_and(|u| u.is_active) {
        Some(Violation::UserNotActive)
    } else if !store.courses().get(course).is_some_and(|c| c.is_open) {
        Some(Violation::CourseNotOpen)
    } else if store
        .enrollments()
        .iter()
        .any(|e| e.user_id == user && e.course_id == course)
    {
        Some(Violation::AlreadyEnrolled)
    } else {
        None
    }
}

fn apply(store: &mut Store, op: &Op) -> Result<(), TestCaseError> {
    match *op {
        Op::CreateUser { email: n, active } => {
            let new = NewUser {
                is_active: active,
                ..NewUser::new(format!("User {n}"), email(n))
            };
            let _ = users::create(store, new);
        }
        Op::UpdateEmail { user, email: n } => {
            let patch = UserPatch {
                email: Some(email(n)),
                ..Default::default()
            };
            let _ = users::update(store, user, patch);
        }
        Op::DeactivateUser(id) => {
            let _ = users::deactivate(store, id);
        }
        Op::DeleteUser(id) => {
            let before = counts(store);
            if let Err(DbError::Conflict { .. }) = users::delete(store, id) {
                prop_assert_eq!(counts(store), before);
                prop_assert!(store.users().contains(id));
            }
        }
        Op::CreateCourse { open } => {
            let new = NewCourse {
                is_open: open,
                ..NewCourse::new("Course", "Description")
            };
            courses::create(store, new);
        }
        Op::CloseCourse(id) => {
            let _ = courses::close(store, id);
        }
        Op::DeleteCourse(id) => {
            let before = counts(store);
            if let Err(DbError::Conflict { .. }) = courses::delete(store, id) {
                prop_assert_eq!(counts(store), before);
                prop_assert!(store.courses().contains(id));
            }
        }
        Op::Enroll { user, course } => {
            let expected = expected_enroll(store, user, course);
            let actual = enrollments::enroll(store, NewEnrollment::new(user, course))
                .err()
                .map(|e| match e {
                    DbError::Validation(violation) => Ok(violation),
                    other => Err(other),
                });
            match (expected, actual) {
                (None, None) => {}
                (Some(want), Some(Ok(got))) => {
                    prop_assert_eq!(want, got);
                }
                (want, got) => {
                    return Err(TestCaseError::fail(format!(
                        "enroll({user}, {course}): expected {want:?}, got {got:?}"
                    )))
                }
            }
        }
        Op::SetCompleted {
            enrollment,
            completed,
        } => {
            // Both paths must leave the same flag behind
            if enrollment % 2 == 0 {
                let _ = enrollments::mark_completion(store, enrollment, completed);
            } else {
                let patch = EnrollmentPatch {
                    completed: Some(completed),
                };
                let _ = enrollments::update(store, enrollment, patch);
            }
            if let Ok(e) = enrollments::get(store, enrollment) {
                prop_assert_eq!(e.completed, completed);
            }
        }
        Op::DeleteEnrollment(id) => {
            let _ = enrollments::delete(store, id);
        }
    }
    Ok(())
}

fn check_invariants(store: &Store) -> Result<(), TestCaseError> {
    let mut emails = HashSet::new();
    for user in store.users().iter() {
        prop_assert!(emails.insert(&user.email), "duplicate email {}", user.email);
    }

    let mut pairs = HashSet::new();
    for e in store.enrollments().iter() {
        prop_assert!(
            pairs.insert((e.user_id, e.course_id)),
            "duplicate enrollment pair ({}, {})",
            e.user_id,
            e.course_id
        );
        // Delete guards keep every reference resolvable
        prop_assert!(store.users().contains(e.user_id));
        prop_assert!(store.courses().contains(e.course_id));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: uniqueness and referential invariants survive any sequence.
    #[test]
    fn property_invariants_hold(ops in proptest::collection::vec(op(), 1..60)) {
        let mut store = Store::new();
        for op in &ops {
            apply(&mut store, op)?;
            check_invariants(&store)?;
        }
    }

    /// PROPERTY: ids are never reused, even after deletes.
    #[test]
    fn property_ids_strictly_increase(ops in proptest::collection::vec(op(), 1..60)) {
        let mut store = Store::new();
        let mut last_user = 1;
        for op in &ops {
            apply(&mut store, op)?;
            if let Some(max) = store.users().iter().map(|u| u.id).max() {
                prop_assert!(store.users().current_next_id() > max);
            }
            prop_assert!(store.users().current_next_id() >= last_user);
            last_user = store.users().current_next_id();
        }
    }
}
