use url::Url;

use super::normalize_base_path;
use crate::urls::RequestUrl;

/// Immutable reference URL anchoring outbound construction.
///
/// Carries the scheme, host and base path that constructed URLs are built
/// on. Scoped route lists derive adjusted references with [`RefUrl::with_host`]
/// and [`RefUrl::with_path`]; every modifier returns a new value. The type
/// is `Eq + Hash` so brokers can memoise their adjustments per reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefUrl {
    scheme: String,
    host: String,
    base_path: String,
}

impl RefUrl {
    /// Create a reference from parts; the base path is normalised to start
    /// and end with `/`.
    #[must_use]
    pub fn new(scheme: &str, host: &str, base_path: &str) -> Self {
        Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            base_path: normalize_base_path(base_path),
        }
    }

    /// Parse an absolute URL string, taking its path as the base path.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(input)?;
        Ok(Self::new(
            url.scheme(),
            url.host_str().unwrap_or_default(),
            url.path(),
        ))
    }

    /// The reference that belongs to an inbound request: same scheme and
    /// host, same base path.
    #[must_use]
    pub fn from_request(request: &RequestUrl) -> Self {
        Self::new(request.scheme(), request.host(), request.base_path())
    }

    /// URL scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name, lowercased.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Base path; starts and ends with `/`.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// A copy of this reference with a different host.
    #[must_use]
    pub fn with_host(&self, host: &str) -> Self {
        Self {
            scheme: self.scheme.clone(),
            host: host.to_ascii_lowercase(),
            base_path: self.base_path.clone(),
        }
    }

    /// A copy of this reference with a different base path.
    #[must_use]
    pub fn with_path(&self, base_path: &str) -> Self {
        Self {
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            base_path: normalize_base_path(base_path),
        }
    }
}
