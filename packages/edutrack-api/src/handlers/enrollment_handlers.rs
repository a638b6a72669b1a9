//! Enrollment endpoint handlers.

use hyper::{body::Bytes, Request, Response};

use crate::router::{AppState, RouterError};
use edutrack_core::models::{EnrollmentPatch, NewEnrollment};
use edutrack_core::services::enrollments;

use super::request_utils::{
    bool_query_param, build_empty_response, json_response, parse_json_body, parse_query_params,
    path_id, MatchitParams,
};

/// Enrolls a user in a course.
///
/// # Endpoint
/// `POST /enrollments`
///
/// # Request Body
/// ```json
/// {
///   "user_id": 1,
///   "course_id": 2,
///   "enrolled_date": "2024-09-01"
/// }
/// ```
/// `enrolled_date` is optional and defaults to today's local date.
///
/// # Response
/// - **201 Created**: Returns the stored enrollment
///
/// # Errors
/// - **400 Bad Request**: Malformed body, or the first failing check of
///   `User not found or not active`, `Course not found or not open for enrollment`,
///   `User is already enrolled in this course`
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/enrollments \
///   -H "Content-Type: application/json" \
///   -d '{"user_id": 1, "course_id": 2}'
/// ```
pub fn enroll(
    req: Request<Bytes>,
    _params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let new: NewEnrollment = parse_json_body(req.body())?;
    let mut store = state.write_store()?;
    let enrollment = enrollments::enroll(&mut store, new)?;
    json_response(201, enrollment)
}

/// `GET /enrollments`
pub fn list_enrollments(
    _req: Request<Bytes>,
    _params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let store = state.read_store()?;
    json_response(200, enrollments::list(&store))
}

/// `GET /enrollments/{id}`
pub fn get_enrollment(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let store = state.read_store()?;
    json_response(200, enrollments::get(&store, id)?)
}

/// Updates the completion flag of an enrollment.
///
/// # Endpoint
/// `PUT /enrollments/{id}`
///
/// # Request Body
/// `{"completed": true}`; an empty object leaves the record unchanged.
pub fn update_enrollment(
    req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let patch: EnrollmentPatch = parse_json_body(req.body())?;
    let mut store = state.write_store()?;
    let enrollment = enrollments::update(&mut store, id, patch)?;
    json_response(200, enrollment)
}

/// `DELETE /enrollments/{id}`
pub fn delete_enrollment(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let mut store = state.write_store()?;
    enrollments::delete(&mut store, id)?;
    build_empty_response(204)
}

/// Sets the completion flag from the query string.
///
/// # Endpoint
/// `PATCH /enrollments/{id}/complete?completed=false`
///
/// `completed` defaults to `true` when omitted.
///
/// # Errors
/// - **400 Bad Request**: `completed` is neither `true` nor `false`
/// - **404 Not Found**: `Enrollment not found`
pub fn mark_completion(
    req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let query = parse_query_params(req.uri().query());
    let completed = bool_query_param(&query, "completed", true)?;

    let mut store = state.write_store()?;
    let enrollment = enrollments::mark_completion(&mut store, id, completed)?;
    json_response(200, enrollment)
}

/// Lists a user's enrollments with user name and course title attached.
///
/// # Endpoint
/// `GET /enrollments/user/{id}`
///
/// # Errors
/// - **404 Not Found**: `User not found`
pub fn user_enrollments(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let store = state.read_store()?;
    json_response(200, enrollments::enrollments_for_user(&store, id)?)
}

/// Lists a course's enrollments with user name and course title attached.
///
/// # Endpoint
/// `GET /enrollments/course/{id}`
///
/// # Errors
/// - **404 Not Found**: `Course not found`
pub fn course_enrollments(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let store = state.read_store()?;
    json_response(200, enrollments::enrollments_for_course(&store, id)?)
}
