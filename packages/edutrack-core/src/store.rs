//! Store container holding the user, course, and enrollment tables.

use chrono::{Local, Utc};

use crate::config::DbConfig;
use crate::models::{Course, Enrollment, User};
use crate::table::Table;

/// Owner of all records.
///
/// Rule-set functions borrow the store for the duration of one call; the
/// HTTP layer serializes access to a shared instance.
#[derive(Debug, Clone, Default)]
pub struct Store {
    users: Table<User>,
    courses: Table<Course>,
    enrollments: Table<Enrollment>,
}

impl Store {
    /// Creates a store seeded with the example data.
    pub fn new() -> Self {
        let mut store = Self::empty();
        store.seed_example_data();
        store
    }

    /// Creates a store with no records.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a store according to `config.seed_example_data`.
    pub fn from_config(config: &DbConfig) -> Self {
        if config.seed_example_data {
            Self::new()
        } else {
            Self::empty()
        }
    }

    pub fn users(&self) -> &Table<User> {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut Table<User> {
        &mut self.users
    }

    pub fn courses(&self) -> &Table<Course> {
        &self.courses
    }

    pub fn courses_mut(&mut self) -> &mut Table<Course> {
        &mut self.courses
    }

    pub fn enrollments(&self) -> &Table<Enrollment> {
        &self.enrollments
    }

    pub fn enrollments_mut(&mut self) -> &mut Table<Enrollment> {
        &mut self.enrollments
    }

    /// Inserts one user, one course, and an enrollment linking them.
    fn seed_example_data(&mut self) {
        let now = Utc::now();

        let user_id = self.users.next_id();
        self.users.insert(
            user_id,
            User {
                id: user_id,
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                is_active: true,
                created_at: now,
            },
        );

        let course_id = self.courses.next_id();
        self.courses.insert(
            course_id,
            Course {
                id: course_id,
                title: "Python Basics".to_string(),
                description: "Learn Python".to_string(),
                is_open: true,
                created_at: now,
            },
        );

        let enrollment_id = self.enrollments.next_id();
        self.enrollments.insert(
            enrollment_id,
            Enrollment {
                id: enrollment_id,
                user_id,
                course_id,
                enrolled_date: Local::now().date_naive(),
                completed: false,
                created_at: now,
            },
        );

        tracing::debug!(user_id, course_id, enrollment_id, "Seeded example data");
    }
}
