//! HTTP transport for the dispatcher.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace and timeout layers)
//!     → request.rs (method, path, query, buffered body)
//!     → Dispatcher::route on the blocking pool
//!     → response.rs (404 / 405 / 500 mapping, JSON bodies)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{HttpContext, X_REQUEST_ID};
pub use server::{HttpDispatcher, HttpServer};
