//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use path_router::routing::{BoxError, Dispatcher, Params};

/// What a test handler saw when it was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub label: &'static str,
    pub params: Params,
}

pub type TestDispatcher = Dispatcher<(), Hit>;

/// Handler recording its label and bindings.
pub fn hit(label: &'static str) -> impl Fn((), Params) -> Result<Hit, BoxError> + Send + Sync + 'static {
    move |_, params| Ok(Hit { label, params })
}

/// Unwrap a routing result that must have invoked a handler.
pub fn expect_hit(result: Result<Option<Hit>, BoxError>) -> Hit {
    match result {
        Ok(Some(hit)) => hit,
        Ok(None) => panic!("expected a handler to run, got no match"),
        Err(err) => panic!("expected a handler to run, got error: {err}"),
    }
}

/// Send one request through a router and decode the JSON body.
pub async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
