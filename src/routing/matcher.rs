//! Route matching logic.
//!
//! # Responsibilities
//! - Resolve a (method, path) pair against a registry snapshot
//! - Bind parameter and wildcard segments from the request path
//! - Distinguish "no such path" from "path exists, method missing"
//!
//! # Design Decisions
//! - Exact patterns are found by binary search before any segment work
//! - The fallback scan starts at the request path's lower bound by default;
//!   `ScanMode::Full` visits every entry instead
//! - First accepted candidate in sort order wins, no specificity ranking
//! - A wildcard never matches its bare prefix; at least one segment must
//!   remain for it to capture
//! - Stateless: every call builds its own `Params`

use serde::{Deserialize, Serialize};

use crate::routing::params::{Params, WILDCARD_KEY};
use crate::routing::registry::{Registry, RouteEntry};
use crate::routing::segment::{self, Segment};

/// Result of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A handler is registered for the method on the matched pattern.
    Matched { handler: usize, params: Params },
    /// A pattern matched but has no handler for the method.
    MethodNotAllowed,
    NotFound,
}

impl RouteOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, RouteOutcome::Matched { .. })
    }

    /// `(path_exists, method_allowed)`.
    pub fn capability(&self) -> (bool, bool) {
        match self {
            RouteOutcome::Matched { .. } => (true, true),
            RouteOutcome::MethodNotAllowed => (true, false),
            RouteOutcome::NotFound => (false, false),
        }
    }
}

/// Which entries the segment-wise fallback visits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Only entries sorting at or after the request path.
    #[default]
    LowerBound,
    /// Every entry, in sort order.
    Full,
}

/// Read-only view used to resolve requests.
#[derive(Debug)]
pub struct Matcher<'a, H> {
    registry: &'a Registry<H>,
    scan: ScanMode,
}

impl<'a, H> Matcher<'a, H> {
    pub fn new(registry: &'a Registry<H>, scan: ScanMode) -> Self {
        Self { registry, scan }
    }

    /// Resolve `method` and `path` to a handler index and bindings.
    pub fn resolve(&self, method: &str, path: &str) -> RouteOutcome {
        if method.is_empty() || path.is_empty() {
            return RouteOutcome::NotFound;
        }

        if let Some(idx) = self.registry.lookup_exact(path) {
            if let Some(entry) = self.registry.entry(idx) {
                return method_outcome(entry, method, path, Params::new());
            }
        }

        let request = segment::split(path);
        let candidates = match self.scan {
            ScanMode::LowerBound => self.registry.entries_from(path),
            ScanMode::Full => self.registry.entries(),
        };

        for entry in candidates {
            if let Some(params) = match_entry(entry, &request) {
                return method_outcome(entry, method, path, params);
            }
        }

        tracing::trace!(method, path, "No route matched");
        RouteOutcome::NotFound
    }

    /// Resolve without dispatching and report `(path_exists, method_allowed)`.
    pub fn can_route(&self, method: &str, path: &str) -> (bool, bool) {
        self.resolve(method, path).capability()
    }
}

fn match_entry(entry: &RouteEntry, request: &[&str]) -> Option<Params> {
    let pattern = entry.pattern();
    let mut params = Params::new();

    if pattern.is_wildcard() {
        let prefix = pattern.prefix();
        if request.len() <= prefix.len() {
            return None;
        }
        if !bind_segments(prefix, &request[..prefix.len()], &mut params) {
            return None;
        }
        params.bind(WILDCARD_KEY, &request[prefix.len()..].join("/"));
        return Some(params);
    }

    if pattern.segments().len() != request.len() {
        return None;
    }
    bind_segments(pattern.segments(), request, &mut params).then_some(params)
}

fn bind_segments(pattern: &[Segment], request: &[&str], params: &mut Params) -> bool {
    for (segment, part) in pattern.iter().zip(request) {
        match segment {
            Segment::Static(literal) if literal == part => {}
            Segment::Static(_) => return false,
            Segment::Param(name) => params.bind(name, part),
            Segment::Wildcard => return false,
        }
    }
    true
}

fn method_outcome(entry: &RouteEntry, method: &str, path: &str, params: Params) -> RouteOutcome {
    match entry.handler_for(method) {
        Some(handler) => {
            tracing::trace!(method, path, pattern = entry.pattern().as_str(), "Route matched");
            RouteOutcome::Matched { handler, params }
        }
        None => {
            tracing::debug!(method, path, "Method not configured for path");
            RouteOutcome::MethodNotAllowed
        }
    }
}
