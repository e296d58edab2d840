//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (startup):
//!     add(method, pattern, handler)
//!     → segment.rs (parse + validate pattern)
//!     → registry.rs (duplicate / shape checks, sorted insert)
//!     → router.rs (publish new registry snapshot)
//!
//! Incoming Request (method, path, context):
//!     → matcher.rs (exact binary search, then segment-wise scan)
//!     → RouteOutcome: Matched | MethodNotAllowed | NotFound
//!     → router.rs (invoke handler or fallback, recover failures)
//!     → Option<response>
//! ```
//!
//! # Design Decisions
//! - No global route table; each `Dispatcher` owns its registry
//! - Handlers are type-erased and stored by index, never inline
//! - Deterministic: first match in sort order wins
//! - Routing is read-only and lock-free once registration is done

pub mod error;
pub mod handler;
pub mod introspect;
pub mod matcher;
pub mod params;
pub mod registry;
pub mod router;
pub mod segment;

pub use error::{RouteError, RouteResult};
pub use handler::{BoxError, Handler};
pub use introspect::{RouteInfo, RouteTable};
pub use matcher::{RouteOutcome, ScanMode};
pub use params::{Params, WILDCARD_KEY};
pub use router::{Dispatcher, DispatcherBuilder};
