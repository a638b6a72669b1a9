//! Course endpoint handlers.

use hyper::{body::Bytes, Request, Response};

use crate::router::{AppState, RouterError};
use edutrack_core::models::{CoursePatch, NewCourse};
use edutrack_core::services::courses;

use super::request_utils::{
    build_empty_response, json_response, parse_json_body, path_id, MatchitParams,
};

/// Creates a course.
///
/// # Endpoint
/// `POST /courses`
///
/// # Request Body
/// ```json
/// {
///   "title": "Rust",
///   "description": "Ownership and borrowing",
///   "is_open": true
/// }
/// ```
///
/// # Response
/// - **201 Created**: Returns the stored course
///
/// # Errors
/// - **400 Bad Request**: Malformed body
pub fn create_course(
    req: Request<Bytes>,
    _params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let new: NewCourse = parse_json_body(req.body())?;

    let mut store = state.write_store()?;
    json_response(201, courses::create(&mut store, new))
}

/// `GET /courses`
pub fn list_courses(
    _req: Request<Bytes>,
    _params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let store = state.read_store()?;
    json_response(200, courses::list(&store))
}

/// `GET /courses/{id}`
pub fn get_course(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let store = state.read_store()?;
    json_response(200, courses::get(&store, id)?)
}

/// Applies a partial update to a course.
///
/// # Endpoint
/// `PUT /courses/{id}`
///
/// Reopening a course is done by sending `{"is_open": true}`.
pub fn update_course(
    req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let patch: CoursePatch = parse_json_body(req.body())?;

    let mut store = state.write_store()?;
    let course = courses::update(&mut store, id, patch)?;
    json_response(200, course)
}

/// Deletes a course that has no enrollments.
///
/// # Endpoint
/// `DELETE /courses/{id}`
///
/// # Errors
/// - **400 Bad Request**: `Cannot delete course with existing enrollments`
/// - **404 Not Found**: `Course not found`
pub fn delete_course(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let mut store = state.write_store()?;
    courses::delete(&mut store, id)?;
    build_empty_response(204)
}

/// Closes a course to new enrollments.
///
/// # Endpoint
/// `PATCH /courses/{id}/close`
pub fn close_course(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let mut store = state.write_store()?;
    let course = courses::close(&mut store, id)?;
    json_response(200, course)
}

/// Lists the distinct users enrolled in a course, in ascending id order.
///
/// # Endpoint
/// `GET /courses/{id}/enrolled-users`
pub fn enrolled_users(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let store = state.read_store()?;
    json_response(200, courses::enrolled_users(&store, id)?)
}
