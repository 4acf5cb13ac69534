//! # Mask Module
//!
//! Masks are the pattern language of the router. A mask describes one URL
//! shape: path segments, `<name regex default>` placeholders, nestable
//! `[...]` optional sections, and an optional `//host/` prefix that flips
//! the route to absolute mode:
//!
//! ```text
//! <presenter>/<action>[/<id \d{1,3}>]
//! //<subdomain>.example.com/<presenter>
//! ```
//!
//! ## Compilation
//!
//! [`Mask::compile`] is a pure function from a mask string to an immutable
//! [`Mask`] value, so compiled masks can be shared between routes and
//! tests. Compilation happens in two phases:
//!
//! 1. **Parsing**: the mask is tokenised into a pattern tree of literals,
//!    placeholders and optional groups; placeholder metadata (name, regex
//!    fragment, default, nesting depth) is collected into a side table.
//! 2. **Derivation**: the tree is turned into one anchored regular
//!    expression for matching, and kept as the construction template that
//!    records which sections are omittable because everything inside them
//!    is at its default.
//!
//! A trailing sequence of segments whose placeholders all carry defaults
//! is implicitly optional, so `<presenter>/<action>` with defaults for
//! both matches `/`, `/shop` and `/shop/list` alike.
//!
//! ## Matching and construction
//!
//! Matching applies the derived regex to the relative request path (and,
//! for absolute masks, a host expression to the request host). The host
//! expression depends on the request's own `%tld%`/`%domain%`/`%sld%`
//! decomposition, so it is assembled per host and memoised.
//!
//! Construction renders the tree back into a path, omitting optional
//! sections in which every placeholder sits at its default.
//!
//! Errors are reported at compile time only; see
//! [`RouteError`](crate::RouteError).

mod compile;
mod core;
#[cfg(test)]
mod tests;

pub use self::core::{Mask, Placeholder, DEFAULT_HOST_PATTERN, DEFAULT_PATH_PATTERN};
pub(crate) use self::core::{ParamOverride, RenderCtx};
