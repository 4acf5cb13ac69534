//! The bidirectional router contract.
//!
//! Anything that can resolve an inbound request into parameters and
//! render parameters back into a URL is a router: a single
//! [`Route`](crate::Route), a whole [`RouteList`](crate::RouteList), or a
//! caller-supplied implementation. Because the broker itself implements
//! the trait, routers nest arbitrarily.

use crate::params::Params;
use crate::urls::{RefUrl, RequestUrl};

/// A bidirectional URL router.
pub trait Router: Send + Sync {
    /// Resolve an inbound request into a parameter mapping.
    ///
    /// `None` means this router does not apply; all failure modes are
    /// silent.
    fn match_url(&self, request: &RequestUrl) -> Option<Params>;

    /// Render a parameter mapping into an absolute URL, anchored on the
    /// reference URL.
    ///
    /// `None` means the parameters cannot be expressed by this router.
    fn construct_url(&self, params: &Params, reference: &RefUrl) -> Option<String>;

    /// Parameters this router fixes to constant values.
    ///
    /// Brokers use these to pick the dispatch-cache key. The default
    /// implementation reports none.
    fn constant_parameters(&self) -> Option<&Params> {
        None
    }

    /// Prepare any internal caches for read-only sharing.
    ///
    /// Called recursively by brokers during
    /// [`RouteList::warmup_cache`](crate::RouteList::warmup_cache); the
    /// default implementation does nothing.
    fn warmup(&self) {}
}
