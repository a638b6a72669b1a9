//! Service info and health endpoints.

use hyper::{body::Bytes, Request, Response};
use serde::Serialize;

use crate::router::{AppState, RouterError};

use super::request_utils::{json_response, MatchitParams};

/// Body of `GET /`.
#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
    description: &'static str,
    endpoints: Endpoints,
}

/// Collection paths keyed by resource name.
#[derive(Debug, Serialize)]
struct Endpoints {
    users: &'static str,
    courses: &'static str,
    enrollments: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

/// `GET /`
pub fn root(
    _req: Request<Bytes>,
    _params: MatchitParams<'_, '_>,
    _state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    json_response(
        200,
        ServiceInfo {
            message: "Welcome to EduTrack Lite API",
            version: env!("CARGO_PKG_VERSION"),
            description: "A system for managing course enrollments and tracking course completion",
            endpoints: Endpoints {
                users: "/users",
                courses: "/courses",
                enrollments: "/enrollments",
            },
        },
    )
}

/// `GET /health`
///
/// Takes the store lock so a poisoned store reports as unhealthy.
pub fn health(
    _req: Request<Bytes>,
    _params: MatchitParams<'_, '_>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let _store = state.read_store()?;
    json_response(200, HealthStatus { status: "healthy" })
}
