//! Response construction.
//!
//! # Responsibilities
//! - Map dispatcher outcomes to HTTP status codes
//! - Build JSON bodies for errors and the echo handler
//!
//! # Design Decisions
//! - Every error body carries the request ID
//! - Handler failures never leak their message to the client

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::http::request::HttpContext;
use crate::routing::Params;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    request_id: &'a str,
}

fn error(status: StatusCode, message: &str, request_id: &str) -> Response {
    let body = ErrorBody {
        error: message,
        request_id,
    };
    (status, Json(body)).into_response()
}

pub fn not_found(request_id: &str) -> Response {
    error(StatusCode::NOT_FOUND, "No matching route found", request_id)
}

pub fn method_not_allowed(request_id: &str) -> Response {
    error(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed for this path",
        request_id,
    )
}

pub fn internal_error(request_id: &str) -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, "Handler failed", request_id)
}

pub fn payload_too_large(request_id: &str) -> Response {
    error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large", request_id)
}

pub fn bad_request(request_id: &str) -> Response {
    error(StatusCode::BAD_REQUEST, "Failed to read request body", request_id)
}

/// Response for a body that could not be buffered, keyed on the rejection's status.
pub fn body_rejection(status: StatusCode, request_id: &str) -> Response {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => payload_too_large(request_id),
        s if s.is_server_error() => internal_error(request_id),
        _ => bad_request(request_id),
    }
}

#[derive(Debug, Serialize)]
struct EchoBody<'a> {
    request_id: &'a str,
    method: &'a str,
    path: &'a str,
    pattern: &'a str,
    params: &'a Params,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    body_bytes: usize,
}

/// Describe the matched request back to the client.
pub fn echo(pattern: &str, ctx: &HttpContext, params: &Params) -> Response {
    let body = EchoBody {
        request_id: &ctx.request_id,
        method: &ctx.method,
        path: &ctx.path,
        pattern,
        params,
        query: ctx.query.as_deref(),
        body_bytes: ctx.body.len(),
    };
    (StatusCode::OK, Json(body)).into_response()
}
