//! Segment parsing for route patterns and request paths.
//!
//! # Responsibilities
//! - Split a pattern or request path into '/'-delimited segments
//! - Classify pattern segments as static, parameter or wildcard
//! - Reject malformed parameters and misplaced wildcards
//!
//! # Design Decisions
//! - Empty segments are dropped, so `/a//b/` splits like `/a/b`
//! - Pure functions only; no allocation beyond the returned segments

use crate::routing::error::{RouteError, RouteResult};

/// One classified segment of a registered pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matched byte-for-byte against the request segment.
    Static(String),
    /// `{name}`: matches any single request segment and binds it.
    Param(String),
    /// Trailing `*`: matches the remainder of the request path.
    Wildcard,
}

impl Segment {
    /// Token used for this segment in a canonical shape.
    pub fn shape_token(&self) -> &str {
        match self {
            Segment::Static(literal) => literal,
            Segment::Param(_) => "{}",
            Segment::Wildcard => "*",
        }
    }
}

/// Split a path into its non-empty '/'-delimited segments.
pub fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Parse a registration pattern into classified segments.
pub fn parse(pattern: &str) -> RouteResult<Vec<Segment>> {
    validate_wildcard(pattern)?;

    let parts = split(pattern);
    let mut segments = Vec::with_capacity(parts.len());
    for part in parts {
        let segment = parse_segment(pattern, part)?;
        if let Segment::Param(name) = &segment {
            let repeated = segments
                .iter()
                .any(|s| matches!(s, Segment::Param(existing) if existing == name));
            if repeated {
                return Err(invalid_parameter(pattern, part, "parameter name repeated"));
            }
        }
        segments.push(segment);
    }
    Ok(segments)
}

/// Canonical shape of a parsed pattern, used only for ambiguity detection.
pub fn canonical_shape(segments: &[Segment]) -> String {
    let mut shape = String::new();
    for segment in segments {
        shape.push('/');
        shape.push_str(segment.shape_token());
    }
    if shape.is_empty() {
        shape.push('/');
    }
    shape
}

fn validate_wildcard(pattern: &str) -> RouteResult<()> {
    let Some(idx) = pattern.find('*') else {
        return Ok(());
    };

    if idx != pattern.len() - 1 {
        return Err(RouteError::InvalidWildcard {
            pattern: pattern.to_string(),
            reason: "wildcard character at invalid position",
        });
    }
    if idx == 0 || pattern.as_bytes()[idx - 1] != b'/' {
        return Err(RouteError::InvalidWildcard {
            pattern: pattern.to_string(),
            reason: "wildcard character not preceded by '/'",
        });
    }
    Ok(())
}

fn parse_segment(pattern: &str, part: &str) -> RouteResult<Segment> {
    if part == "*" {
        return Ok(Segment::Wildcard);
    }
    if part.starts_with(':') {
        return Err(invalid_parameter(pattern, part, "use {name} instead of :name"));
    }
    if let Some(rest) = part.strip_prefix('{') {
        let Some(name) = rest.strip_suffix('}') else {
            return Err(invalid_parameter(pattern, part, "missing closing '}'"));
        };
        if name.is_empty() {
            return Err(invalid_parameter(pattern, part, "empty parameter name"));
        }
        return Ok(Segment::Param(name.to_string()));
    }
    Ok(Segment::Static(part.to_string()))
}

fn invalid_parameter(pattern: &str, segment: &str, reason: &'static str) -> RouteError {
    RouteError::InvalidParameter {
        pattern: pattern.to_string(),
        segment: segment.to_string(),
        reason,
    }
}
