use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

use regex::Regex;
use serde_json::Value;

use crate::domain::HostParts;
use crate::error::RouteError;

/// Pattern a path placeholder falls back to: one path segment.
pub const DEFAULT_PATH_PATTERN: &str = "[^/]+";

/// Pattern a host placeholder falls back to: one host label.
pub const DEFAULT_HOST_PATTERN: &str = "[^.]+";

/// One named slot in a mask.
#[derive(Debug, Clone)]
pub struct Placeholder {
    /// Parameter name as written in the mask
    pub name: String,
    /// Effective regex fragment the value must satisfy
    pub pattern: String,
    /// Effective default value, from the mask or from route metadata
    pub default: Option<Value>,
    /// How many `[...]` levels the placeholder is nested under (0 = required)
    pub depth: usize,
    /// Whether the placeholder sits in the host part of the mask
    pub in_host: bool,
    /// Default as written in the mask itself, before metadata overrides
    pub(crate) mask_default: Option<String>,
    /// Synthetic regex capture group name; mask names may contain `-`,
    /// which regex group names do not admit
    pub(crate) group: String,
    /// Anchored form of `pattern`, used to round-trip outbound values
    pub(crate) value_regex: Regex,
}

/// Node of the compiled pattern tree.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Literal(String),
    Param(usize),
    Optional(Vec<Node>),
}

/// Metadata overlay applied to a placeholder during compilation.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParamOverride {
    pub pattern: Option<String>,
    pub default: Option<Value>,
}

/// Immutable compiled form of a mask string.
///
/// Produced by [`Mask::compile`]; holds the pattern tree, the placeholder
/// table and the derived matching regex. A `Mask` is read-only after
/// compilation and cheap to clone (the host-regex memo is shared).
#[derive(Debug, Clone)]
pub struct Mask {
    pub(super) source: String,
    pub(super) host: Option<Vec<Node>>,
    pub(super) path: Vec<Node>,
    pub(super) placeholders: Vec<Placeholder>,
    pub(super) path_regex: Regex,
    pub(super) trailing_slash: bool,
    /// Memo of host regexes keyed by their expanded source; absolute masks
    /// only, and only when enabled by runtime configuration
    pub(super) host_cache: Option<Arc<RwLock<HashMap<String, Arc<Regex>>>>>,
}

/// Everything construction needs to render one URL from a mask.
///
/// All three slices are indexed by placeholder position: the rendered
/// outbound value (post filter-out), the rendered default, and whether the
/// caller supplied a value that differs from the default.
pub(crate) struct RenderCtx<'a> {
    pub values: &'a [Option<String>],
    pub defaults: &'a [Option<String>],
    pub non_default: &'a [bool],
}

impl RenderCtx<'_> {
    fn value(&self, index: usize) -> Option<&str> {
        self.values[index]
            .as_deref()
            .or(self.defaults[index].as_deref())
    }
}

impl Mask {
    /// Compile a mask string.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::MaskSyntax`] for unbalanced brackets, an
    /// unterminated or malformed placeholder, or a regex fragment the
    /// engine rejects, and [`RouteError::DuplicateParameter`] when a
    /// placeholder name appears twice.
    pub fn compile(source: &str) -> Result<Self, RouteError> {
        Self::compile_with(source, &HashMap::new())
    }

    /// Compile with per-parameter metadata overlays (pattern and default
    /// overrides). Used by `Route::new`; the overlays must be known at
    /// compile time because patterns shape the derived regex and defaults
    /// decide which trailing segments become implicitly optional.
    pub(crate) fn compile_with(
        source: &str,
        overrides: &HashMap<String, ParamOverride>,
    ) -> Result<Self, RouteError> {
        super::compile::compile(source, overrides)
    }

    /// The mask string as given at compilation.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the mask carries a `//host/` prefix.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.host.is_some()
    }

    /// Whether the mask ends in `/`, making constructed URLs end in `/`.
    #[must_use]
    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// The placeholder table, in mask order (host placeholders first).
    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Index of a placeholder by parameter name.
    #[must_use]
    pub fn placeholder_index(&self, name: &str) -> Option<usize> {
        self.placeholders.iter().position(|ph| ph.name == name)
    }

    /// Match the relative request path against the mask.
    ///
    /// Returns raw captured strings per placeholder index; host
    /// placeholders stay `None` here. `None` means no match.
    pub(crate) fn match_relative_path(&self, relative: &str) -> Option<Vec<Option<String>>> {
        let captures = self.path_regex.captures(relative)?;
        let mut raw = vec![None; self.placeholders.len()];
        for (index, placeholder) in self.placeholders.iter().enumerate() {
            if placeholder.in_host {
                continue;
            }
            raw[index] = captures
                .name(&placeholder.group)
                .map(|m| m.as_str().to_string());
        }
        Some(raw)
    }

    /// Match a request host against the host part of an absolute mask.
    ///
    /// The host expression embeds the request host's own
    /// `%tld%`/`%domain%`/`%sld%` decomposition, so it is assembled per
    /// host and memoised by its expanded source.
    pub(crate) fn match_host(&self, host: &str) -> Option<Vec<Option<String>>> {
        let nodes = self.host.as_ref()?;
        let parts = HostParts::of(host);
        let source = host_regex_source(nodes, &self.placeholders, &parts);
        let regex = self.host_regex(&source)?;
        let captures = regex.captures(host)?;
        let mut raw = vec![None; self.placeholders.len()];
        for (index, placeholder) in self.placeholders.iter().enumerate() {
            if !placeholder.in_host {
                continue;
            }
            raw[index] = captures
                .name(&placeholder.group)
                .map(|m| m.as_str().to_string());
        }
        Some(raw)
    }

    /// Render the path part of a URL from outbound values.
    ///
    /// Optional sections are included only when at least one placeholder
    /// inside them carries a non-default value. Returns `None` when a
    /// required placeholder has neither a value nor a default.
    pub(crate) fn build_relative_path(&self, ctx: &RenderCtx<'_>) -> Option<String> {
        let mut out = String::new();
        if !render_nodes(&self.path, ctx, None, &mut out) {
            return None;
        }
        if self.trailing_slash && !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        Some(out)
    }

    /// Render the host part of an absolute mask, expanding
    /// `%tld%`/`%domain%`/`%sld%` from the reference host.
    pub(crate) fn build_host(&self, ctx: &RenderCtx<'_>, reference_host: &str) -> Option<String> {
        let nodes = self.host.as_ref()?;
        let parts = HostParts::of(reference_host);
        let mut out = String::new();
        if !render_nodes(nodes, ctx, Some(&parts), &mut out) {
            return None;
        }
        Some(out)
    }

    fn host_regex(&self, source: &str) -> Option<Arc<Regex>> {
        if let Some(cache) = &self.host_cache {
            if let Some(hit) = cache
                .read()
                .expect("host regex cache lock poisoned")
                .get(source)
            {
                return Some(hit.clone());
            }
        }
        let compiled = Arc::new(Regex::new(source).ok()?);
        if let Some(cache) = &self.host_cache {
            cache
                .write()
                .expect("host regex cache lock poisoned")
                .insert(source.to_string(), compiled.clone());
        }
        Some(compiled)
    }
}

/// Append the regex form of a node sequence to `out`.
///
/// With `parts` set (host position), `%tld%`-family variables inside
/// literals are substituted before escaping.
pub(super) fn push_node_regex(
    nodes: &[Node],
    placeholders: &[Placeholder],
    parts: Option<&HostParts>,
    out: &mut String,
) {
    for node in nodes {
        match node {
            Node::Literal(text) => {
                let expanded = match parts {
                    Some(parts) => expand_literal(text, parts),
                    None => text.clone(),
                };
                out.push_str(&regex::escape(&expanded));
            }
            Node::Param(index) => {
                let placeholder = &placeholders[*index];
                let _ = write!(out, "(?P<{}>{})", placeholder.group, placeholder.pattern);
            }
            Node::Optional(children) => {
                out.push_str("(?:");
                push_node_regex(children, placeholders, parts, out);
                out.push_str(")?");
            }
        }
    }
}

fn host_regex_source(nodes: &[Node], placeholders: &[Placeholder], parts: &HostParts) -> String {
    let mut body = String::new();
    push_node_regex(nodes, placeholders, Some(parts), &mut body);
    format!("(?i)^{}$", body)
}

fn expand_literal(text: &str, parts: &HostParts) -> String {
    text.replace("%tld%", &parts.tld)
        .replace("%domain%", &parts.domain)
        .replace("%sld%", &parts.sld)
}

fn render_nodes(
    nodes: &[Node],
    ctx: &RenderCtx<'_>,
    parts: Option<&HostParts>,
    out: &mut String,
) -> bool {
    for node in nodes {
        match node {
            Node::Literal(text) => match parts {
                Some(parts) => out.push_str(&expand_literal(text, parts)),
                None => out.push_str(text),
            },
            Node::Param(index) => match ctx.value(*index) {
                Some(value) => out.push_str(value),
                None => return false,
            },
            Node::Optional(children) => {
                if has_non_default(children, ctx) && !render_nodes(children, ctx, parts, out) {
                    return false;
                }
            }
        }
    }
    true
}

fn has_non_default(nodes: &[Node], ctx: &RenderCtx<'_>) -> bool {
    nodes.iter().any(|node| match node {
        Node::Param(index) => ctx.non_default[*index],
        Node::Optional(children) => has_non_default(children, ctx),
        Node::Literal(_) => false,
    })
}
