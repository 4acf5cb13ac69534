use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::core::{
    push_node_regex, Mask, Node, ParamOverride, Placeholder, DEFAULT_HOST_PATTERN,
    DEFAULT_PATH_PATTERN,
};
use crate::error::RouteError;
use crate::runtime_config::RuntimeConfig;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z_][A-Za-z0-9_-]*$").expect("placeholder name pattern"));

/// Characters that mark a placeholder token as a regex fragment rather
/// than a default value.
const REGEX_METACHARS: &[char] = &[
    '\\', '.', '^', '$', '|', '?', '*', '+', '(', ')', '[', ']', '{', '}',
];

/// Placeholder as collected by the parser, before overlays and regex
/// derivation.
struct RawPlaceholder {
    name: String,
    pattern: Option<String>,
    default: Option<String>,
    depth: usize,
    in_host: bool,
}

struct Parser<'a> {
    /// Full mask, for error reporting
    mask: &'a str,
    chars: Vec<char>,
    pos: usize,
    in_host: bool,
    raw: &'a mut Vec<RawPlaceholder>,
}

impl Parser<'_> {
    fn syntax_error(&self, detail: &str) -> RouteError {
        RouteError::MaskSyntax {
            mask: self.mask.to_string(),
            detail: detail.to_string(),
        }
    }

    fn parse_sequence(&mut self, depth: usize) -> Result<Vec<Node>, RouteError> {
        let mut nodes = Vec::new();
        let mut literal = String::new();
        while self.pos < self.chars.len() {
            match self.chars[self.pos] {
                '[' => {
                    flush_literal(&mut literal, &mut nodes);
                    self.pos += 1;
                    let inner = self.parse_sequence(depth + 1)?;
                    if self.pos >= self.chars.len() || self.chars[self.pos] != ']' {
                        return Err(self.syntax_error("unbalanced '['"));
                    }
                    self.pos += 1;
                    nodes.push(Node::Optional(inner));
                }
                ']' => {
                    if depth == 0 {
                        return Err(self.syntax_error("unbalanced ']'"));
                    }
                    flush_literal(&mut literal, &mut nodes);
                    return Ok(nodes);
                }
                '<' => {
                    flush_literal(&mut literal, &mut nodes);
                    let index = self.parse_placeholder(depth)?;
                    nodes.push(Node::Param(index));
                }
                other => {
                    literal.push(other);
                    self.pos += 1;
                }
            }
        }
        if depth > 0 {
            return Err(self.syntax_error("unbalanced '['"));
        }
        flush_literal(&mut literal, &mut nodes);
        Ok(nodes)
    }

    fn parse_placeholder(&mut self, depth: usize) -> Result<usize, RouteError> {
        self.pos += 1; // consume '<'
        let mut content = String::new();
        while self.pos < self.chars.len() && self.chars[self.pos] != '>' {
            content.push(self.chars[self.pos]);
            self.pos += 1;
        }
        if self.pos >= self.chars.len() {
            return Err(self.syntax_error("unterminated '<'"));
        }
        self.pos += 1; // consume '>'

        let mut tokens = content.split_whitespace();
        let name = match tokens.next() {
            Some(name) => name,
            None => return Err(self.syntax_error("empty placeholder")),
        };
        if !NAME_PATTERN.is_match(name) {
            return Err(self.syntax_error(&format!("invalid placeholder name '{}'", name)));
        }
        if self.raw.iter().any(|existing| existing.name == name) {
            return Err(RouteError::DuplicateParameter {
                mask: self.mask.to_string(),
                name: name.to_string(),
            });
        }
        let rest: Vec<&str> = tokens.collect();
        let (pattern, default) = split_pattern_and_default(&rest);
        self.raw.push(RawPlaceholder {
            name: name.to_string(),
            pattern,
            default,
            depth,
            in_host: self.in_host,
        });
        Ok(self.raw.len() - 1)
    }
}

/// Flush the pending literal buffer into nodes, splitting on `/` so every
/// segment separator becomes its own node. Separate separator nodes are
/// what the implicit-optional transform keys on.
fn flush_literal(buffer: &mut String, nodes: &mut Vec<Node>) {
    if buffer.is_empty() {
        return;
    }
    let text = std::mem::take(buffer);
    let mut rest = text.as_str();
    while let Some(slash) = rest.find('/') {
        if slash > 0 {
            nodes.push(Node::Literal(rest[..slash].to_string()));
        }
        nodes.push(Node::Literal("/".to_string()));
        rest = &rest[slash + 1..];
    }
    if !rest.is_empty() {
        nodes.push(Node::Literal(rest.to_string()));
    }
}

/// Apply the spec heuristic to the tokens after a placeholder name: a
/// token containing regex metacharacters is the regex fragment, anything
/// else is the default. With more than two tokens the fragment itself
/// contains whitespace; the final token is the default unless it, too,
/// looks like regex.
fn split_pattern_and_default(tokens: &[&str]) -> (Option<String>, Option<String>) {
    match tokens {
        [] => (None, None),
        [single] => {
            if looks_like_regex(single) {
                (Some((*single).to_string()), None)
            } else {
                (None, Some((*single).to_string()))
            }
        }
        [pattern, default] => (Some((*pattern).to_string()), Some((*default).to_string())),
        many => {
            let (last, head) = many.split_last().expect("token list is non-empty");
            if looks_like_regex(last) {
                (Some(many.join(" ")), None)
            } else {
                (Some(head.join(" ")), Some((*last).to_string()))
            }
        }
    }
}

fn looks_like_regex(token: &str) -> bool {
    token.chars().any(|c| REGEX_METACHARS.contains(&c))
}

pub(super) fn compile(
    source: &str,
    overrides: &HashMap<String, ParamOverride>,
) -> Result<Mask, RouteError> {
    let (host_part, path_part) = match source.strip_prefix("//") {
        Some(rest) => match rest.find('/') {
            Some(slash) => (Some(&rest[..slash]), &rest[slash + 1..]),
            None => (Some(rest), ""),
        },
        None => (None, source),
    };
    let trailing_slash = path_part.ends_with('/');
    let path_part = path_part.strip_suffix('/').unwrap_or(path_part);

    let mut raw: Vec<RawPlaceholder> = Vec::new();
    let host_nodes = match host_part {
        Some(host) => {
            let mut parser = Parser {
                mask: source,
                chars: host.chars().collect(),
                pos: 0,
                in_host: true,
                raw: &mut raw,
            };
            Some(parser.parse_sequence(0)?)
        }
        None => None,
    };
    let path_nodes = {
        let mut parser = Parser {
            mask: source,
            chars: path_part.chars().collect(),
            pos: 0,
            in_host: false,
            raw: &mut raw,
        };
        parser.parse_sequence(0)?
    };

    let placeholders = finalize_placeholders(source, raw, overrides)?;
    let path_nodes = auto_optionalize(path_nodes, &placeholders);

    let mut regex_source = String::from("^");
    push_node_regex(&path_nodes, &placeholders, None, &mut regex_source);
    regex_source.push_str("/?$");
    let path_regex = Regex::new(&regex_source).map_err(|err| RouteError::MaskSyntax {
        mask: source.to_string(),
        detail: err.to_string(),
    })?;

    let config = RuntimeConfig::from_env();
    let host_cache = match (&host_nodes, config.host_regex_cache) {
        (Some(_), true) => Some(Arc::new(RwLock::new(HashMap::new()))),
        _ => None,
    };

    Ok(Mask {
        source: source.to_string(),
        host: host_nodes,
        path: path_nodes,
        placeholders,
        path_regex,
        trailing_slash,
        host_cache,
    })
}

fn finalize_placeholders(
    source: &str,
    raw: Vec<RawPlaceholder>,
    overrides: &HashMap<String, ParamOverride>,
) -> Result<Vec<Placeholder>, RouteError> {
    let mut placeholders = Vec::with_capacity(raw.len());
    for (index, item) in raw.into_iter().enumerate() {
        let overlay = overrides.get(&item.name);
        let pattern = overlay
            .and_then(|o| o.pattern.clone())
            .or_else(|| item.pattern.clone())
            .unwrap_or_else(|| {
                if item.in_host {
                    DEFAULT_HOST_PATTERN.to_string()
                } else {
                    DEFAULT_PATH_PATTERN.to_string()
                }
            });
        let default = overlay
            .and_then(|o| o.default.clone())
            .or_else(|| item.default.clone().map(Value::String));
        let value_regex =
            Regex::new(&format!("^(?:{})$", pattern)).map_err(|err| RouteError::MaskSyntax {
                mask: source.to_string(),
                detail: format!("invalid pattern for '{}': {}", item.name, err),
            })?;
        placeholders.push(Placeholder {
            name: item.name,
            pattern,
            default,
            depth: item.depth,
            in_host: item.in_host,
            mask_default: item.default,
            group: format!("p{}", index),
            value_regex,
        });
    }
    Ok(placeholders)
}

/// Make a trailing run of defaulted segments implicitly optional.
///
/// A segment qualifies when it contains a placeholder or an optional
/// group and every placeholder in it carries a default; a literal stops
/// the scan. Qualifying segments are rewrapped right-to-left into nested
/// optional groups, each carrying its own leading separator, so
/// `<presenter>/<action>` with two defaults behaves like
/// `[<presenter>[/<action>]]`.
fn auto_optionalize(nodes: Vec<Node>, placeholders: &[Placeholder]) -> Vec<Node> {
    let mut segments = split_segments(nodes);
    let total = segments.len();
    let mut split = total;
    while split > 0 && is_implicitly_optional(&segments[split - 1], placeholders) {
        split -= 1;
    }
    if split == total {
        return join_segments(segments);
    }
    let tail = segments.split_off(split);
    let mut wrapped: Option<Node> = None;
    for (offset, segment) in tail.into_iter().enumerate().rev() {
        let mut inner = Vec::new();
        if split + offset > 0 {
            inner.push(Node::Literal("/".to_string()));
        }
        inner.extend(segment);
        if let Some(deeper) = wrapped.take() {
            inner.push(deeper);
        }
        wrapped = Some(Node::Optional(inner));
    }
    let mut out = join_segments(segments);
    if let Some(node) = wrapped {
        out.push(node);
    }
    out
}

fn split_segments(nodes: Vec<Node>) -> Vec<Vec<Node>> {
    let mut segments: Vec<Vec<Node>> = vec![Vec::new()];
    for node in nodes {
        if matches!(&node, Node::Literal(sep) if sep == "/") {
            segments.push(Vec::new());
        } else {
            segments
                .last_mut()
                .expect("segment list starts non-empty")
                .push(node);
        }
    }
    segments
}

fn join_segments(segments: Vec<Vec<Node>>) -> Vec<Node> {
    let mut out = Vec::new();
    for (index, segment) in segments.into_iter().enumerate() {
        if index > 0 {
            out.push(Node::Literal("/".to_string()));
        }
        out.extend(segment);
    }
    out
}

fn is_implicitly_optional(segment: &[Node], placeholders: &[Placeholder]) -> bool {
    !segment.is_empty()
        && segment
            .iter()
            .any(|node| matches!(node, Node::Param(_) | Node::Optional(_)))
        && segment.iter().all(|node| match node {
            Node::Param(index) => placeholders[*index].default.is_some(),
            Node::Optional(_) => true,
            Node::Literal(_) => false,
        })
}
