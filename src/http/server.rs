//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router whose fallback forwards to the dispatcher
//! - Wire up middleware (request ID, tracing, timeout)
//! - Map dispatcher results to HTTP responses
//! - Bind server to listener

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::request::{self, HttpContext, MAX_BODY_BYTES, X_REQUEST_ID};
use crate::http::response;
use crate::routing::Dispatcher;

/// Dispatcher type served over HTTP.
pub type HttpDispatcher = Dispatcher<HttpContext, Response>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<HttpDispatcher>,
}

/// HTTP front end for a dispatcher.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `dispatcher`.
    pub fn new(config: ServiceConfig, dispatcher: Arc<HttpDispatcher>) -> Self {
        let state = AppState { dispatcher };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
    }

    /// The fully layered router, e.g. for driving with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Forward every request to the dispatcher.
///
/// Dispatch is synchronous and handlers may block, so it runs on the
/// blocking pool.
async fn dispatch_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    let request_id = request::request_id(req.headers());

    let ctx = match HttpContext::from_request(req).await {
        Ok(ctx) => ctx,
        Err(rejection) => {
            let status = rejection.status();
            tracing::warn!(request_id = %request_id, status = %status, error = %rejection, "Failed to read request body");
            return response::body_rejection(status, &request_id);
        }
    };
    let method = ctx.method.clone();
    let path = ctx.path.clone();

    tracing::debug!(request_id = %request_id, method = %method, path = %path, "Dispatching request");

    let dispatcher = Arc::clone(&state.dispatcher);
    let result = {
        let (method, path) = (method.clone(), path.clone());
        tokio::task::spawn_blocking(move || dispatcher.route(&method, &path, ctx)).await
    };

    match result {
        Ok(Ok(Some(response))) => response,
        Ok(Ok(None)) => {
            if path_exists(&state.dispatcher, &method, &path) {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, "Method not allowed");
                response::method_not_allowed(&request_id)
            } else {
                tracing::debug!(request_id = %request_id, path = %path, "No route matched");
                response::not_found(&request_id)
            }
        }
        Ok(Err(err)) => {
            tracing::error!(request_id = %request_id, path = %path, error = %err, "Handler failed");
            response::internal_error(&request_id)
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, path = %path, error = %err, "Handler task aborted");
            response::internal_error(&request_id)
        }
    }
}

/// Whether `path` exists for some method, honouring the trailing-slash retry.
fn path_exists(dispatcher: &HttpDispatcher, method: &str, path: &str) -> bool {
    let (exists, _) = dispatcher
        .resolve_with(method, path, dispatcher.trim_trailing_slash())
        .capability();
    exists
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
