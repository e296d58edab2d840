//! Registration error definitions.

use thiserror::Error;

/// Errors raised while registering a route.
///
/// Registration is all-or-nothing: when any of these is returned the
/// registry is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The pattern is already registered for the method, or another pattern
    /// with the same canonical shape is.
    #[error("Duplicate path {pattern} for method {method} clashes with {existing}")]
    DuplicateRoute {
        method: String,
        pattern: String,
        existing: String,
    },

    /// A `{name}` segment is malformed or uses the legacy `:name` form.
    #[error("Path {pattern} has invalid parameter {segment}: {reason}")]
    InvalidParameter {
        pattern: String,
        segment: String,
        reason: &'static str,
    },

    /// A `*` appears anywhere other than as a trailing `/*`.
    #[error("Path {pattern} has invalid wildcard: {reason}")]
    InvalidWildcard {
        pattern: String,
        reason: &'static str,
    },
}

/// Result type for registration operations.
pub type RouteResult<T> = Result<T, RouteError>;
