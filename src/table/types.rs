use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Root of a route-table document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDoc {
    /// Routes registered directly on the top-level list
    #[serde(default)]
    pub routes: Vec<TableRoute>,
    /// Nested scoped groups, in order after the flat routes
    #[serde(default)]
    pub groups: Vec<TableGroup>,
}

/// One route entry: a mask plus declarative metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableRoute {
    /// The mask string
    pub mask: String,
    /// Defaults for placeholders; constants for names the mask lacks
    #[serde(default)]
    pub defaults: serde_json::Map<String, Value>,
    /// Per-parameter regex overrides
    #[serde(default)]
    pub patterns: HashMap<String, String>,
    /// Construction-only flag
    #[serde(default)]
    pub one_way: bool,
}

/// A scoped group: a nested list gated by domain and/or path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableGroup {
    /// Domain pattern (`%sld%.example.com`) gating the group
    #[serde(default)]
    pub domain: Option<String>,
    /// Path prefix (`/admin`) scoping the group
    #[serde(default)]
    pub path: Option<String>,
    /// Routes inside the group
    #[serde(default)]
    pub routes: Vec<TableRoute>,
    /// Further nested groups
    #[serde(default)]
    pub groups: Vec<TableGroup>,
}
