//! Host pattern expansion.
//!
//! Domain patterns may reference three variables derived from a concrete
//! host name: `%tld%`, `%domain%` and `%sld%`. Expanding a pattern against
//! a host yields a plain host string that is then compared for equality -
//! there is no wildcard matching. The self-referential trick is what makes
//! the variables useful: expanding `%sld%.example.com` against
//! `api.example.com` yields `api.example.com`, so the pattern accepts any
//! subdomain of `example.com` while rejecting unrelated hosts.

use std::net::Ipv4Addr;

/// The `%tld%` / `%domain%` / `%sld%` decomposition of a host name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostParts {
    /// Last label of the host (`com`), or the whole host for IPv4 addresses
    pub tld: String,
    /// Registrable domain: the last two labels (`example.com`), or the whole
    /// host when it has a single label
    pub domain: String,
    /// The label chain in front of the registrable domain (`api`, or `a.b`
    /// for `a.b.example.com`); the first label for a bare two-label host;
    /// empty for single labels and addresses
    pub sld: String,
}

impl HostParts {
    /// Decompose a host name.
    ///
    /// Hosts that parse as IPv4 addresses are treated as a single label:
    /// `%tld%` and `%domain%` are the address itself and `%sld%` is empty.
    #[must_use]
    pub fn of(host: &str) -> Self {
        if host.parse::<Ipv4Addr>().is_ok() {
            return Self {
                tld: host.to_string(),
                domain: host.to_string(),
                sld: String::new(),
            };
        }
        let labels: Vec<&str> = host.split('.').collect();
        match labels.len() {
            0 | 1 => Self {
                tld: host.to_string(),
                domain: host.to_string(),
                sld: String::new(),
            },
            n => Self {
                tld: labels[n - 1].to_string(),
                domain: labels[n - 2..].join("."),
                sld: if n == 2 {
                    labels[0].to_string()
                } else {
                    labels[..n - 2].join(".")
                },
            },
        }
    }
}

/// Expand a domain pattern against a concrete host.
///
/// Substitution is purely textual; the caller compares the result to the
/// host it cares about.
#[must_use]
pub fn expand_domain(pattern: &str, host: &str) -> String {
    let parts = HostParts::of(host);
    pattern
        .replace("%tld%", &parts.tld)
        .replace("%domain%", &parts.domain)
        .replace("%sld%", &parts.sld)
}
