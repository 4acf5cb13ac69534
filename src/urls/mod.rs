//! # URL Adapter Module
//!
//! Routing works on two URL views rather than on wire bytes:
//!
//! - [`RequestUrl`]: a read-only view of an inbound request (scheme, host,
//!   path, base path, query mapping). Scoped route lists derive narrower
//!   views from it with [`RequestUrl::with_base_path`]; the original is
//!   never mutated.
//! - [`RefUrl`]: an immutable reference URL used as the anchor for
//!   outbound construction. Modifiers return new values.
//!
//! Both views can be built from parts or parsed from a URL string via the
//! `url` crate. Query strings are decoded and encoded with
//! `url::form_urlencoded`; the router core itself never touches percent
//! encoding.

mod reference;
mod request;

pub use reference::RefUrl;
pub use request::RequestUrl;

/// Normalise a base path so it starts and ends with `/`.
pub(crate) fn normalize_base_path(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
