//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Detect malformed and conflicting routes before startup
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Route conflicts are found by registering into a scratch registry, so
//!   the rules can never drift from the ones applied at runtime

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::routing::registry::Registry;
use crate::routing::RouteError;

/// A single semantic problem in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("routes[{index}].method {method:?} must be a non-empty uppercase token")]
    InvalidMethod { index: usize, method: String },

    #[error("routes[{index}].pattern {pattern:?} must start with '/'")]
    InvalidPattern { index: usize, pattern: String },

    #[error("routes[{index}]: {source}")]
    Route {
        index: usize,
        #[source]
        source: RouteError,
    },
}

/// Check a parsed config, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    let mut scratch: Registry<()> = Registry::with_capacity(config.routes.len());
    for (index, route) in config.routes.iter().enumerate() {
        if !is_method_token(&route.method) {
            errors.push(ValidationError::InvalidMethod {
                index,
                method: route.method.clone(),
            });
            continue;
        }
        if !route.pattern.starts_with('/') {
            errors.push(ValidationError::InvalidPattern {
                index,
                pattern: route.pattern.clone(),
            });
            continue;
        }
        if let Err(source) = scratch.register(&route.method, &route.pattern, (), &route.reference) {
            errors.push(ValidationError::Route { index, source });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_method_token(method: &str) -> bool {
    !method.is_empty() && method.bytes().all(|b| b.is_ascii_uppercase())
}
