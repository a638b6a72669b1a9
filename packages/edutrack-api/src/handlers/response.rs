//! Error body shared by every endpoint.
//!
//! Successful responses carry the entity, list, or info object as the bare
//! JSON body; only errors get a wrapper.

use serde::Serialize;

/// Body of every error response: `{"detail": "User not found"}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub detail: String,
}

/// Builds an error body.
pub fn error_response(detail: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        detail: detail.into(),
    }
}
