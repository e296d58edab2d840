//! Request handling and transformation.
//!
//! # Responsibilities
//! - Extract routing-relevant information (method, path, query)
//! - Carry the request ID assigned by the middleware stack
//! - Buffer the body so handlers can run off the async runtime
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body size bounded before buffering; rejections keep their status so
//!   only length-limit failures become 413
//! - Context is cheap to clone; the body is reference counted

use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::FromRequest;
use axum::http::{HeaderMap, Request};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Largest body the server buffers for a handler.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Per-request context handed to every dispatcher handler.
#[derive(Debug, Clone)]
pub struct HttpContext {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpContext {
    /// Split an incoming request into a context, buffering its body.
    ///
    /// The body limit is whichever of the server's `RequestBodyLimitLayer`
    /// and axum's default body limit is smaller.
    pub async fn from_request(request: Request<Body>) -> Result<Self, BytesRejection> {
        let (parts, body) = request.into_parts();
        let head = Self {
            request_id: request_id(&parts.headers),
            method: parts.method.as_str().to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers.clone(),
            body: Bytes::new(),
        };

        let body = Bytes::from_request(Request::from_parts(parts, body), &()).await?;
        Ok(Self { body, ..head })
    }
}

/// Request ID from the headers, or "unknown" when absent.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_from_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/service/candy/toffee?size=large")
            .header(X_REQUEST_ID, "req-1")
            .body(Body::from("hello"))
            .unwrap();

        let ctx = HttpContext::from_request(request).await.unwrap();
        assert_eq!(ctx.request_id, "req-1");
        assert_eq!(ctx.method, "POST");
        assert_eq!(ctx.path, "/service/candy/toffee");
        assert_eq!(ctx.query.as_deref(), Some("size=large"));
        assert_eq!(&ctx.body[..], b"hello");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_as_too_large() {
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from(vec![0u8; 3 * MAX_BODY_BYTES]))
            .unwrap();

        let rejection = HttpContext::from_request(request).await.unwrap_err();
        assert_eq!(rejection.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_missing_request_id() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let ctx = HttpContext::from_request(request).await.unwrap();
        assert_eq!(ctx.request_id, "unknown");
        assert!(ctx.query.is_none());
    }
}
