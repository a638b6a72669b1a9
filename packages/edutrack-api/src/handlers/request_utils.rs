//! Request utilities for HTTP endpoints.

use std::collections::HashMap;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::{body::Bytes, Request, Response};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time;

use crate::router::RouterError;

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Reads a request body with a timeout and a size cap.
pub async fn read_request_body_with_timeout<B>(
    req: Request<B>,
    timeout_ms: u64,
    max_bytes: usize,
) -> Result<Request<Bytes>, RouterError>
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let collected = time::timeout(timeout_duration, Limited::new(body, max_bytes).collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                RouterError::PayloadTooLarge
            } else {
                RouterError::InternalError(format!("Failed to read request body: {}", e))
            }
        })?;
    Ok(Request::from_parts(parts, collected.to_bytes()))
}

/// Parses a JSON request body into `T`.
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, RouterError> {
    serde_json::from_slice(body)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))
}

/// Parses a numeric path parameter.
pub(crate) fn path_id(params: &MatchitParams<'_, '_>, name: &str) -> Result<u64, RouterError> {
    let raw = params
        .get(name)
        .ok_or_else(|| RouterError::InternalError(format!("Missing path parameter '{}'", name)))?;
    raw.parse()
        .map_err(|e| RouterError::BadRequest(format!("Invalid {} '{}': {}", name, raw, e)))
}

/// Parses a URL query string into decoded key/value pairs.
///
/// Pairs without `=` are ignored; later duplicates win.
pub(crate) fn parse_query_params(query_str: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query_str) = query_str {
        for pair in query_str.split('&') {
            let Some((key, encoded_value)) = pair.split_once('=') else {
                continue;
            };
            let decoded_value = percent_decode_str(encoded_value).decode_utf8_lossy();
            params.insert(key.to_string(), decoded_value.into_owned());
        }
    }
    params
}

/// Parses an optional boolean query parameter.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off` in any case.
pub(crate) fn bool_query_param(
    params: &HashMap<String, String>,
    name: &str,
    default: bool,
) -> Result<bool, RouterError> {
    let Some(raw) = params.get(name) else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(RouterError::BadRequest(format!(
            "Invalid {} value '{}': expected a boolean",
            name, raw
        ))),
    }
}

/// Checks that `email` looks like `local@domain.tld`.
pub(crate) fn validate_email(email: &str) -> Result<(), RouterError> {
    let invalid = || RouterError::BadRequest(format!("Invalid email address '{}'", email));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels_ok = domain.split('.').all(|label| !label.is_empty());
    if !domain.contains('.') || !labels_ok {
        return Err(invalid());
    }
    Ok(())
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Helper to build empty HTTP response (for 204 No Content)
pub fn build_empty_response(status: u16) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .body(Bytes::new())
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Serializes `data` as the response body.
pub fn json_response<T: Serialize>(status: u16, data: T) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(&data)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}
