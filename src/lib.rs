//! Path-based HTTP request router.
//!
//! Resolves (method, path) pairs against registered patterns with
//! `{name}` parameters and trailing `*` wildcards, then dispatches to the
//! matched handler. The `http` module serves a dispatcher over Axum.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use routing::{Dispatcher, Params, RouteError, RouteOutcome};
