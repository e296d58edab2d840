//! Path parameter bindings produced by a successful match.

use std::collections::BTreeMap;

use serde::Serialize;

/// Key under which a wildcard route exposes the matched remainder of the path.
pub const WILDCARD_KEY: &str = "_wildcard_";

/// Parameter name to matched request substring.
///
/// A fresh value is built for every routing call and handed to the handler
/// by value; nothing is cached or shared between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params {
    inner: BTreeMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Remainder of the path matched by a trailing `*`.
    pub fn wildcard(&self) -> Option<&str> {
        self.get(WILDCARD_KEY)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.inner
    }

    /// First binding for a name wins.
    pub(crate) fn bind(&mut self, name: &str, value: &str) {
        self.inner
            .entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
