//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing, config and http produce:
//!     → tracing events with structured fields
//!     → logging.rs (filter, then pretty or JSON formatting)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows from the HTTP layer into every request span

pub mod logging;
