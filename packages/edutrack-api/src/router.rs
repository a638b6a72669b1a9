//! Matchit routing configuration.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hyper::header::HeaderValue;
use hyper::{body::Bytes, Method, Request, Response, StatusCode};
use matchit::Router as MatchitRouter;

use crate::handlers;
use edutrack_core::{config::DbConfig, store::Store, DbError};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Store guarded by a single lock so every request sees a consistent
    /// view across all three tables
    pub store: Arc<RwLock<Store>>,
    /// Service configuration
    pub config: Arc<DbConfig>,
}

impl AppState {
    /// Wraps a store and configuration for sharing between connections.
    pub fn new(store: Store, config: DbConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
        }
    }

    /// Locks the store for a read-only operation.
    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, Store>, RouterError> {
        self.store
            .read()
            .map_err(|_| RouterError::InternalError("Store lock poisoned".to_string()))
    }

    /// Locks the store for a mutating operation.
    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, Store>, RouterError> {
        self.store
            .write()
            .map_err(|_| RouterError::InternalError("Store lock poisoned".to_string()))
    }
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with all service routes.
    ///
    /// Collection routes are registered with and without a trailing slash.
    pub fn new(state: AppState) -> Result<Self, matchit::InsertError> {
        let mut router = MatchitRouter::new();

        router.insert("/", RouteHandler::Root)?;
        router.insert("/health", RouteHandler::Health)?;

        // User endpoints
        router.insert("/users", RouteHandler::Users)?;
        router.insert("/users/", RouteHandler::Users)?;
        router.insert("/users/{id}", RouteHandler::User)?;
        router.insert("/users/{id}/deactivate", RouteHandler::UserDeactivate)?;

        // Course endpoints
        router.insert("/courses", RouteHandler::Courses)?;
        router.insert("/courses/", RouteHandler::Courses)?;
        router.insert("/courses/{id}", RouteHandler::Course)?;
        router.insert("/courses/{id}/close", RouteHandler::CourseClose)?;
        router.insert(
            "/courses/{id}/enrolled-users",
            RouteHandler::CourseEnrolledUsers,
        )?;

        // Enrollment endpoints
        router.insert("/enrollments", RouteHandler::Enrollments)?;
        router.insert("/enrollments/", RouteHandler::Enrollments)?;
        router.insert("/enrollments/{id}", RouteHandler::Enrollment)?;
        router.insert("/enrollments/{id}/complete", RouteHandler::EnrollmentComplete)?;
        router.insert("/enrollments/user/{id}", RouteHandler::UserEnrollments)?;
        router.insert("/enrollments/course/{id}", RouteHandler::CourseEnrollments)?;

        Ok(Self {
            inner: router,
            state,
        })
    }

    /// Returns the shared application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Routes a request and renders any error as a JSON error response.
    ///
    /// Every response carries the CORS headers.
    pub fn handle(&self, req: Request<Bytes>) -> Response<Bytes> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let response = match self.route(req) {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    RouterError::InternalError(msg) => {
                        tracing::error!(%method, %path, "Internal error: {}", msg)
                    }
                    _ => tracing::debug!(%method, %path, kind = err.kind(), "Request rejected: {}", err),
                }
                err.into()
            }
        };
        tracing::debug!(%method, %path, status = response.status().as_u16(), "Handled request");
        with_cors(response)
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Arguments
    /// * `req` - HTTP request with its body already collected
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub fn route(&self, req: Request<Bytes>) -> Result<Response<Bytes>, RouterError> {
        let path = req.uri().path().to_string();

        match self.inner.at(&path) {
            Ok(matched) => {
                if req.method() == Method::OPTIONS {
                    return handlers::build_empty_response(204);
                }
                matched.value.handle(req, matched.params, &self.state)
            }
            Err(_) => Err(RouterError::NotFound("Not Found".to_string())),
        }
    }
}

/// Adds permissive CORS headers.
pub(crate) fn with_cors(mut response: Response<Bytes>) -> Response<Bytes> {
    let headers = response.headers_mut();
    headers.insert(
        hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        hyper::header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, PATCH, DELETE, OPTIONS"),
    );
    headers.insert(
        hyper::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("*"),
    );
    response
}

/// Route handler function.
enum RouteHandler {
    Root,
    Health,
    Users,
    User,
    UserDeactivate,
    Courses,
    Course,
    CourseClose,
    CourseEnrolledUsers,
    Enrollments,
    Enrollment,
    EnrollmentComplete,
    UserEnrollments,
    CourseEnrollments,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    fn handle(
        &self,
        req: Request<Bytes>,
        params: matchit::Params<'_, '_>,
        state: &AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        let method = req.method().clone();
        match self {
            RouteHandler::Root if method == Method::GET => handlers::root(req, params, state),
            RouteHandler::Health if method == Method::GET => handlers::health(req, params, state),
            RouteHandler::Users => {
                if method == Method::POST {
                    handlers::create_user(req, params, state)
                } else if method == Method::GET {
                    handlers::list_users(req, params, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::User => {
                if method == Method::GET {
                    handlers::get_user(req, params, state)
                } else if method == Method::PUT {
                    handlers::update_user(req, params, state)
                } else if method == Method::DELETE {
                    handlers::delete_user(req, params, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::UserDeactivate if method == Method::PATCH => {
                handlers::deactivate_user(req, params, state)
            }
            RouteHandler::Courses => {
                if method == Method::POST {
                    handlers::create_course(req, params, state)
                } else if method == Method::GET {
                    handlers::list_courses(req, params, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Course => {
                if method == Method::GET {
                    handlers::get_course(req, params, state)
                } else if method == Method::PUT {
                    handlers::update_course(req, params, state)
                } else if method == Method::DELETE {
                    handlers::delete_course(req, params, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::CourseClose if method == Method::PATCH => {
                handlers::close_course(req, params, state)
            }
            RouteHandler::CourseEnrolledUsers if method == Method::GET => {
                handlers::enrolled_users(req, params, state)
            }
            RouteHandler::Enrollments => {
                if method == Method::POST {
                    handlers::enroll(req, params, state)
                } else if method == Method::GET {
                    handlers::list_enrollments(req, params, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Enrollment => {
                if method == Method::GET {
                    handlers::get_enrollment(req, params, state)
                } else if method == Method::PUT {
                    handlers::update_enrollment(req, params, state)
                } else if method == Method::DELETE {
                    handlers::delete_enrollment(req, params, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::EnrollmentComplete if method == Method::PATCH => {
                handlers::mark_completion(req, params, state)
            }
            RouteHandler::UserEnrollments if method == Method::GET => {
                handlers::user_enrollments(req, params, state)
            }
            RouteHandler::CourseEnrollments if method == Method::GET => {
                handlers::course_enrollments(req, params, state)
            }
            _ => Err(RouterError::MethodNotAllowed),
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    /// Rejected by a rule set
    Rule(DbError),
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    PayloadTooLarge,
    BadRequest(String),
    NotFound(String),
}

impl RouterError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::Rule(DbError::NotFound { .. }) => 404,
            RouterError::Rule(DbError::Validation(_) | DbError::Conflict { .. }) => 400,
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::PayloadTooLarge => 413,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
        }
    }

    /// Machine-readable error tag, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::Rule(DbError::NotFound { .. }) | RouterError::NotFound(_) => "not_found",
            RouterError::Rule(DbError::Validation(_)) => "validation_error",
            RouterError::Rule(DbError::Conflict { .. }) => "conflict",
            RouterError::MethodNotAllowed => "method_not_allowed",
            RouterError::InternalError(_) => "internal_error",
            RouterError::Timeout => "timeout",
            RouterError::PayloadTooLarge => "payload_too_large",
            RouterError::BadRequest(_) => "bad_request",
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::Rule(err) => write!(f, "{}", err),
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::PayloadTooLarge => write!(f, "Payload Too Large"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<DbError> for RouterError {
    fn from(err: DbError) -> Self {
        RouterError::Rule(err)
    }
}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        // Internal details stay in the log
        let message = match &err {
            RouterError::Rule(err) => err.to_string(),
            RouterError::InternalError(_) => "Internal Server Error".to_string(),
            RouterError::BadRequest(msg) | RouterError::NotFound(msg) => msg.clone(),
            other => other.to_string(),
        };

        let error_response = handlers::error_response(message);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|e| {
            format!("{{\"detail\":\"Failed to serialize error: {}\"}}", e).into_bytes()
        });

        let mut response = Response::new(Bytes::from(body));
        *response.status_mut() =
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        response.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}
