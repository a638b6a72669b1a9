//! Entity records, creation inputs, and partial-update patches.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The three record kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    User,
    Course,
    Enrollment,
}

impl Entity {
    /// Lowercase noun used inside sentences.
    pub fn noun(&self) -> &'static str {
        match self {
            Entity::User => "user",
            Entity::Course => "course",
            Entity::Enrollment => "enrollment",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::User => write!(f, "User"),
            Entity::Course => write!(f, "Course"),
            Entity::Enrollment => write!(f, "Enrollment"),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    /// Unique across all users, compared case-sensitively
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewUser {
    /// Active user with the given name and email.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            is_active: true,
        }
    }
}

/// Partial update for a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

/// A course users can enroll in while it is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Whether new enrollments may reference this course
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a course.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    #[serde(default = "default_true")]
    pub is_open: bool,
}

impl NewCourse {
    /// Open course with the given title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            is_open: true,
        }
    }
}

/// Partial update for a course. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_open: Option<bool>,
}

/// Link between a user and a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: u64,
    pub user_id: u64,
    pub course_id: u64,
    pub enrolled_date: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for enrolling a user in a course.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEnrollment {
    pub user_id: u64,
    pub course_id: u64,
    /// Defaults to today when absent
    #[serde(default)]
    pub enrolled_date: Option<NaiveDate>,
}

impl NewEnrollment {
    /// Enrollment dated today.
    pub fn new(user_id: u64, course_id: u64) -> Self {
        Self {
            user_id,
            course_id,
            enrolled_date: None,
        }
    }
}

/// Partial update for an enrollment. Only the completion flag is patchable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentPatch {
    pub completed: Option<bool>,
}

/// Enrollment joined with the referenced user's name and course's title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentDetails {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub user_name: String,
    pub course_title: String,
}
