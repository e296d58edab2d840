//! Route storage.
//!
//! # Responsibilities
//! - Own the sorted collection of route entries
//! - Own the append-only handler table
//! - Reject duplicate and ambiguous registrations
//!
//! # Design Decisions
//! - Entries stay sorted by pattern so lookups can binary search
//! - A trailing `*` sorts as `~`, placing wildcard routes after every
//!   concrete path sharing their prefix
//! - Entries refer to handlers by index; handlers never move once pushed
//! - Registration validates everything before mutating anything

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::segment::{self, Segment};

/// A parsed registration pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    key: String,
    segments: Vec<Segment>,
    shape: String,
}

impl RoutePattern {
    /// Parse and validate a pattern.
    pub fn parse(raw: &str) -> RouteResult<Self> {
        let segments = segment::parse(raw)?;
        let shape = segment::canonical_shape(&segments);
        let key = match raw.strip_suffix('*') {
            Some(prefix) => format!("{prefix}~"),
            None => raw.to_string(),
        };
        Ok(Self {
            raw: raw.to_string(),
            key,
            segments,
            shape,
        })
    }

    /// The pattern exactly as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Ordering key for the entry collection.
    pub fn sort_key(&self) -> &str {
        &self.key
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn shape(&self) -> &str {
        &self.shape
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    /// Segments before a trailing wildcard (all segments otherwise).
    pub fn prefix(&self) -> &[Segment] {
        if self.is_wildcard() {
            &self.segments[..self.segments.len() - 1]
        } else {
            &self.segments
        }
    }

    /// True when no segment captures anything.
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Static(_)))
    }
}

/// One registered pattern and the handlers bound to it per method.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pattern: RoutePattern,
    reference: String,
    methods: Vec<(String, usize)>,
}

impl RouteEntry {
    fn new(pattern: RoutePattern, method: &str, handler: usize, reference: &str) -> Self {
        Self {
            pattern,
            reference: reference.to_string(),
            methods: vec![(method.to_string(), handler)],
        }
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Documentation reference supplied at registration, possibly empty.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Registered methods in registration order.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|(m, _)| m.as_str())
    }

    /// Handler table index for `method`.
    pub fn handler_for(&self, method: &str) -> Option<usize> {
        self.methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, idx)| *idx)
    }
}

/// Sorted route entries plus the handler table they index into.
#[derive(Debug, Clone)]
pub struct Registry<H> {
    entries: Vec<RouteEntry>,
    handlers: Vec<H>,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self::with_capacity(32)
    }
}

impl<H> Registry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            handlers: Vec::with_capacity(capacity),
        }
    }

    /// Register `handler` for `method` on `pattern`.
    ///
    /// Returns the handler's index in the handler table. Re-registering an
    /// existing pattern for a new method extends that pattern's entry.
    pub fn register(
        &mut self,
        method: &str,
        pattern: &str,
        handler: H,
        reference: &str,
    ) -> RouteResult<usize> {
        let parsed = RoutePattern::parse(pattern)?;

        let existing = self.position_of(&parsed);
        if let Some(pos) = existing {
            if self.entries[pos].handler_for(method).is_some() {
                return Err(RouteError::DuplicateRoute {
                    method: method.to_string(),
                    pattern: pattern.to_string(),
                    existing: pattern.to_string(),
                });
            }
        }

        let clash = self.entries.iter().find(|e| {
            e.pattern.raw != parsed.raw
                && e.pattern.shape == parsed.shape
                && e.handler_for(method).is_some()
        });
        if let Some(clash) = clash {
            return Err(RouteError::DuplicateRoute {
                method: method.to_string(),
                pattern: pattern.to_string(),
                existing: clash.pattern.raw.clone(),
            });
        }

        let idx = self.handlers.len();
        self.handlers.push(handler);

        match existing {
            Some(pos) => {
                let entry = &mut self.entries[pos];
                entry.methods.push((method.to_string(), idx));
                if entry.reference.is_empty() {
                    entry.reference = reference.to_string();
                }
            }
            None => {
                let pos = self.entries.partition_point(|e| {
                    (e.pattern.key.as_str(), e.pattern.raw.as_str())
                        < (parsed.key.as_str(), parsed.raw.as_str())
                });
                self.entries
                    .insert(pos, RouteEntry::new(parsed, method, idx, reference));
            }
        }

        tracing::debug!(method, pattern, handler = idx, "Route registered");
        Ok(idx)
    }

    /// Index of the first entry whose sort key is not less than `path`.
    pub fn lower_bound(&self, path: &str) -> usize {
        self.entries
            .partition_point(|e| e.pattern.sort_key() < path)
    }

    /// Index of the non-wildcard entry whose pattern equals `path`.
    pub fn lookup_exact(&self, path: &str) -> Option<usize> {
        let start = self.lower_bound(path);
        self.entries[start..]
            .iter()
            .take_while(|e| e.pattern.sort_key() == path)
            .position(|e| !e.pattern.is_wildcard())
            .map(|offset| start + offset)
    }

    /// Entries in ascending order starting at `path`'s lower bound.
    pub fn entries_from(&self, path: &str) -> &[RouteEntry] {
        &self.entries[self.lower_bound(path)..]
    }

    /// All entries in ascending order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> Option<&RouteEntry> {
        self.entries.get(idx)
    }

    pub fn handler(&self, idx: usize) -> Option<&H> {
        self.handlers.get(idx)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position_of(&self, pattern: &RoutePattern) -> Option<usize> {
        let start = self.lower_bound(pattern.sort_key());
        self.entries[start..]
            .iter()
            .take_while(|e| e.pattern.key == pattern.key)
            .position(|e| e.pattern.raw == pattern.raw)
            .map(|offset| start + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(registry: &Registry<u32>) -> Vec<&str> {
        registry.entries().iter().map(|e| e.pattern().as_str()).collect()
    }

    #[test]
    fn test_entries_stay_sorted() {
        let mut registry = Registry::new();
        registry.register("GET", "/service/shutdown", 1, "").unwrap();
        registry.register("GET", "/device/sensor/*", 2, "").unwrap();
        registry.register("GET", "/device/sensor/{id}", 3, "").unwrap();
        registry.register("GET", "/", 4, "").unwrap();

        assert_eq!(
            patterns(&registry),
            vec!["/", "/device/sensor/{id}", "/device/sensor/*", "/service/shutdown"]
        );
        let keys: Vec<&str> = registry
            .entries()
            .iter()
            .map(|e| e.pattern().sort_key())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_second_method_extends_entry() {
        let mut registry = Registry::new();
        let first = registry.register("GET", "/a/{x}", 10, "").unwrap();
        let second = registry.register("POST", "/a/{x}", 20, "#/ref").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.handler_count(), 2);
        let entry = registry.entry(0).unwrap();
        assert_eq!(entry.methods().collect::<Vec<_>>(), vec!["GET", "POST"]);
        assert_eq!(entry.handler_for("GET"), Some(first));
        assert_eq!(entry.handler_for("POST"), Some(second));
        assert_eq!(entry.reference(), "#/ref");
        assert_eq!(registry.handler(second), Some(&20));
    }

    #[test]
    fn test_duplicate_method_rejected_without_mutation() {
        let mut registry = Registry::new();
        registry.register("GET", "/a/{x}", 1, "").unwrap();

        let err = registry.register("GET", "/a/{x}", 2, "").unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRoute { .. }));

        let err = registry.register("GET", "/a/{y}", 3, "").unwrap_err();
        match err {
            RouteError::DuplicateRoute { existing, .. } => assert_eq!(existing, "/a/{x}"),
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.handler_count(), 1);
    }

    #[test]
    fn test_same_shape_allowed_for_other_method() {
        let mut registry = Registry::new();
        registry.register("GET", "/a/{x}", 1, "").unwrap();
        registry.register("POST", "/a/{y}", 2, "").unwrap();
        assert_eq!(registry.len(), 2);

        // Extending "/a/{y}" with GET would make it ambiguous with "/a/{x}".
        assert!(registry.register("GET", "/a/{y}", 3, "").is_err());
        assert_eq!(registry.handler_count(), 2);
    }

    #[test]
    fn test_parser_errors_leave_registry_untouched() {
        let mut registry = Registry::new();
        assert!(registry.register("GET", "/a/:x", 1, "").is_err());
        assert!(registry.register("GET", "/a/b*", 1, "").is_err());
        assert!(registry.is_empty());
        assert_eq!(registry.handler_count(), 0);
    }

    #[test]
    fn test_lookup_exact_skips_wildcards() {
        let mut registry = Registry::new();
        registry.register("GET", "/a/~", 1, "").unwrap();
        registry.register("GET", "/a/*", 2, "").unwrap();

        let idx = registry.lookup_exact("/a/~").unwrap();
        assert_eq!(registry.entry(idx).unwrap().pattern().as_str(), "/a/~");
        assert!(registry.lookup_exact("/a/*").is_none());
        assert!(registry.lookup_exact("/a").is_none());
    }

    #[test]
    fn test_entries_from_lower_bound() {
        let mut registry = Registry::new();
        registry.register("GET", "/a", 1, "").unwrap();
        registry.register("GET", "/b/{x}", 2, "").unwrap();
        registry.register("GET", "/c", 3, "").unwrap();

        let tail: Vec<&str> = registry
            .entries_from("/b/1")
            .iter()
            .map(|e| e.pattern().as_str())
            .collect();
        assert_eq!(tail, vec!["/b/{x}", "/c"]);
    }
}
