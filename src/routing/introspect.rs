//! Read-only view of the registered routes for documentation tooling.

use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;

use crate::routing::registry::Registry;

/// One registered pattern and the methods bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub path: String,
    pub methods: Vec<String>,
    #[serde(rename = "ref", skip_serializing_if = "String::is_empty")]
    pub reference: String,
}

/// Registered routes plus static/dynamic counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    pub paths: Vec<RouteInfo>,
    pub total: usize,
    #[serde(rename = "static")]
    pub static_count: usize,
    #[serde(rename = "dynamic")]
    pub dynamic_count: usize,
}

impl RouteTable {
    pub fn from_registry<H>(registry: &Registry<H>) -> Self {
        let paths: Vec<RouteInfo> = registry
            .entries()
            .iter()
            .map(|entry| RouteInfo {
                path: entry.pattern().as_str().to_string(),
                methods: entry.methods().map(str::to_string).collect(),
                reference: entry.reference().to_string(),
            })
            .collect();
        let static_count = registry
            .entries()
            .iter()
            .filter(|entry| entry.pattern().is_static())
            .count();

        Self {
            total: paths.len(),
            static_count,
            dynamic_count: paths.len() - static_count,
            paths,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// OpenAPI-style `paths:` stub with one `$ref` per pattern.
    pub fn to_yaml(&self) -> String {
        let mut out = String::with_capacity(32 * self.paths.len() + 8);
        out.push_str("paths:\n");
        for info in &self.paths {
            let reference = info.reference.replace('"', "\\\"");
            let _ = write!(out, "  {}:\n    $ref: \"{}\"\n", info.path, reference);
        }
        out
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
