//! User endpoint handlers.

use hyper::{body::Bytes, Request, Response};

use crate::router::{AppState, RouterError};
use edutrack_core::models::{NewUser, UserPatch};
use edutrack_core::services::users;

use super::request_utils::{
    build_empty_response, json_response, parse_json_body, path_id, validate_email, MatchitParams,
};

/// Registers a new user.
///
/// # Endpoint
/// `POST /users`
///
/// # Request Body
/// ```json
/// {
///   "name": "Bob",
///   "email": "bob@example.com",
///   "is_active": true
/// }
/// ```
/// `is_active` is optional and defaults to `true`.
///
/// # Response
/// - **201 Created**: Returns the stored user with its assigned id
///
/// # Errors
/// - **400 Bad Request**: Malformed body, invalid email, or `Email already exists`
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/users \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Bob", "email": "bob@example.com"}'
/// ```
pub fn create_user(
    req: Request<Bytes>,
    _params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let new: NewUser = parse_json_body(req.body())?;
    validate_email(&new.email)?;

    let mut store = state.write_store()?;
    let user = users::create(&mut store, new)?;
    json_response(201, user)
}

/// Lists all users in id order.
///
/// # Endpoint
/// `GET /users`
pub fn list_users(
    _req: Request<Bytes>,
    _params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let store = state.read_store()?;
    json_response(200, users::list(&store))
}

/// Fetches one user.
///
/// # Endpoint
/// `GET /users/{id}`
///
/// # Errors
/// - **400 Bad Request**: Non-numeric id
/// - **404 Not Found**: `User not found`
pub fn get_user(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let store = state.read_store()?;
    json_response(200, users::get(&store, id)?)
}

/// Applies a partial update to a user.
///
/// # Endpoint
/// `PUT /users/{id}`
///
/// # Request Body
/// Any subset of `name`, `email`, and `is_active`. Absent fields keep
/// their stored values.
///
/// # Errors
/// - **400 Bad Request**: Malformed body, invalid email, or an email held by
///   another user
/// - **404 Not Found**: `User not found`
pub fn update_user(
    req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let patch: UserPatch = parse_json_body(req.body())?;
    if let Some(email) = &patch.email {
        validate_email(email)?;
    }

    let mut store = state.write_store()?;
    let user = users::update(&mut store, id, patch)?;
    json_response(200, user)
}

/// Deletes a user that has no enrollments.
///
/// # Endpoint
/// `DELETE /users/{id}`
///
/// # Response
/// - **204 No Content**
///
/// # Errors
/// - **400 Bad Request**: `Cannot delete user with existing enrollments`
/// - **404 Not Found**: `User not found`
pub fn delete_user(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let mut store = state.write_store()?;
    users::delete(&mut store, id)?;
    build_empty_response(204)
}

/// Marks a user inactive. Existing enrollments are kept.
///
/// # Endpoint
/// `PATCH /users/{id}/deactivate`
pub fn deactivate_user(
    _req: Request<Bytes>,
    params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = path_id(&params, "id")?;
    let mut store = state.write_store()?;
    let user = users::deactivate(&mut store, id)?;
    json_response(200, user)
}
