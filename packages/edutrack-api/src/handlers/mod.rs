//! HTTP endpoint implementations for users, courses, and enrollments.
//!
//! Handlers parse and shape-check the request, call exactly one rule-set
//! operation under the store lock, and serialize its result.

mod course_handlers;
mod enrollment_handlers;
mod meta_handlers;
mod request_utils;
mod response;
mod user_handlers;

pub use course_handlers::{
    close_course, create_course, delete_course, enrolled_users, get_course, list_courses,
    update_course,
};
pub use enrollment_handlers::{
    course_enrollments, delete_enrollment, enroll, get_enrollment, list_enrollments,
    mark_completion, update_enrollment, user_enrollments,
};
pub use meta_handlers::{health, root};
pub use request_utils::{
    build_empty_response, build_response, json_response, read_request_body_with_timeout,
    MatchitParams,
};
pub use response::{error_response, ErrorResponse};
pub use user_handlers::{
    create_user, deactivate_user, delete_user, get_user, list_users, update_user,
};
