//! Rule sets for users, courses, and enrollments.
//!
//! Each function borrows the [`Store`](crate::store::Store) for one call.
//! Enrollment rules depend on the read-only `is_active` and `is_open`
//! queries of the other two.

pub mod courses;
pub mod enrollments;
pub mod users;
