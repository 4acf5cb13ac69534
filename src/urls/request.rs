use serde_json::Value;
use url::Url;

use super::normalize_base_path;
use crate::params::Params;

/// Read-only view of an inbound request URL.
///
/// The path is always absolute (`/admin/users`); the base path marks the
/// prefix the application is mounted under and always starts and ends with
/// `/`. Routes match against [`RequestUrl::relative_path`], the part of the
/// path behind the base.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestUrl {
    scheme: String,
    host: String,
    path: String,
    base_path: String,
    query: Params,
}

impl RequestUrl {
    /// Create a view from parts, with the base path defaulting to `/`.
    #[must_use]
    pub fn new(scheme: &str, host: &str, path: &str) -> Self {
        Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            path: if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            },
            base_path: "/".to_string(),
            query: Params::new(),
        }
    }

    /// Parse an absolute URL string into a view.
    ///
    /// The query string is decoded into the parameter mapping; repeated
    /// keys keep the last value.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(input)?;
        let host = url.host_str().unwrap_or_default();
        let mut view = Self::new(url.scheme(), host, url.path());
        for (key, value) in url.query_pairs() {
            view.query.insert(key.to_string(), Value::String(value.to_string()));
        }
        Ok(view)
    }

    /// URL scheme (`http`, `https`, ...).
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name, lowercased.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Absolute path including the base path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Base path the application is mounted under; starts and ends with `/`.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The path behind the base path, without a leading slash.
    ///
    /// Returns an empty string when the path equals the base path, and the
    /// full path (minus the leading slash) when the path does not lie under
    /// the base at all: scoping gates treat that as a non-match.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        match self.path.strip_prefix(self.base_path.as_str()) {
            Some(rest) => rest,
            None => self.path.trim_start_matches('/'),
        }
    }

    /// Decoded query mapping, in document order.
    #[must_use]
    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Replace a query parameter, returning a new view.
    #[must_use]
    pub fn with_query_param(&self, name: &str, value: &str) -> Self {
        let mut view = self.clone();
        view.query.insert(name, Value::String(value.to_string()));
        view
    }

    /// Derive a view with a different base path.
    ///
    /// Used by path-scoped route lists to hand children a request whose
    /// base includes the scope prefix. The path itself is unchanged.
    #[must_use]
    pub fn with_base_path(&self, base_path: &str) -> Self {
        let mut view = self.clone();
        view.base_path = normalize_base_path(base_path);
        view
    }

    /// Derive a view with a different path.
    #[must_use]
    pub fn with_path(&self, path: &str) -> Self {
        let mut view = self.clone();
        view.path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        view
    }
}
