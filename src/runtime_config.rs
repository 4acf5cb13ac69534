//! # Runtime Configuration Module
//!
//! Environment variable tuning for the router's internal caches.
//!
//! ## Environment Variables
//!
//! ### `MASKROUTE_REF_CACHE_CAP`
//!
//! Capacity of each route list's per-reference-URL memo (the
//! domain/path-adjusted reference kept per distinct [`crate::RefUrl`]).
//! Default: `64`. A value of `0` disables the memo entirely; the
//! adjustment is then recomputed on every construction.
//!
//! ### `MASKROUTE_HOST_REGEX_CACHE`
//!
//! `on`/`off` toggle for the expanded host-regex memo kept by absolute
//! masks (`//<sub>.%domain%/...`). Default: `on`. With the memo off the
//! host expression is recompiled for every distinct request host.

use std::env;

const DEFAULT_REF_CACHE_CAP: usize = 64;

/// Cache tuning loaded from environment variables.
///
/// Read once per `RouteList`/`Mask` at construction time; changing the
/// environment afterwards does not affect existing routers.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Capacity of the per-reference-URL memo (0 disables it)
    pub ref_cache_capacity: usize,
    /// Whether absolute masks memoise their expanded host regexes
    pub host_regex_cache: bool,
}

impl RuntimeConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults on anything unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let ref_cache_capacity = match env::var("MASKROUTE_REF_CACHE_CAP") {
            Ok(val) => val.parse().unwrap_or(DEFAULT_REF_CACHE_CAP),
            Err(_) => DEFAULT_REF_CACHE_CAP,
        };
        let host_regex_cache = !matches!(
            env::var("MASKROUTE_HOST_REGEX_CACHE").as_deref(),
            Ok("off") | Ok("0") | Ok("false")
        );
        RuntimeConfig {
            ref_cache_capacity,
            host_regex_cache,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ref_cache_capacity: DEFAULT_REF_CACHE_CAP,
            host_regex_cache: true,
        }
    }
}
