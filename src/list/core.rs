use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::cache::{build, scalar_key, DispatchCache};
use crate::domain::expand_domain;
use crate::params::Params;
use crate::route::{ParamMeta, Route};
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::urls::{RefUrl, RequestUrl};
use crate::RouteError;

/// Marks a router as construction-only: it never participates in
/// `match_url` and does not vote on the dispatch-cache key.
pub const ONE_WAY: u8 = 1;

enum Child {
    Route(Route),
    List(Box<RouteList>),
    Custom(Box<dyn Router>),
}

pub(super) struct Entry {
    child: Child,
    flags: u8,
}

impl Entry {
    pub(super) fn router(&self) -> &dyn Router {
        match &self.child {
            Child::Route(route) => route,
            Child::List(list) => list.as_ref(),
            Child::Custom(router) => router.as_ref(),
        }
    }

    pub(super) fn one_way(&self) -> bool {
        self.flags & ONE_WAY != 0
    }
}

/// Ordered composition of routers with optional domain/path scoping and a
/// construction-time dispatch cache.
///
/// Mutable during setup; after [`RouteList::warmup_cache`] the list is
/// safe for concurrent `match_url` / `construct_url` as long as no
/// further mutation happens. Every mutation drops the dispatch cache.
pub struct RouteList {
    entries: Vec<Entry>,
    domain: Option<String>,
    /// Normalised scope prefix: no leading slash, trailing slash
    path_prefix: Option<String>,
    cache: RwLock<Option<Arc<DispatchCache>>>,
    /// Domain/path-adjusted reference URLs, keyed per reference
    ref_memo: RwLock<HashMap<RefUrl, RefUrl>>,
    config: RuntimeConfig,
}

impl fmt::Debug for RouteList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteList")
            .field("children", &self.entries.len())
            .field("domain", &self.domain)
            .field("path", &self.path_prefix)
            .finish()
    }
}

impl Default for RouteList {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteList {
    /// Create an empty list, tuned from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::from_env())
    }

    /// Create an empty list with explicit tuning.
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            entries: Vec::new(),
            domain: None,
            path_prefix: None,
            cache: RwLock::new(None),
            ref_memo: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The domain pattern gating this list, if any.
    #[must_use]
    pub fn domain_pattern(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Append a router.
    pub fn add<R: Router + 'static>(&mut self, router: R, flags: u8) -> &mut Self {
        self.invalidate();
        self.entries.push(Entry {
            child: Child::Custom(Box::new(router)),
            flags,
        });
        self
    }

    /// Insert a router at the front of the list.
    pub fn prepend<R: Router + 'static>(&mut self, router: R, flags: u8) -> &mut Self {
        self.invalidate();
        self.entries.insert(
            0,
            Entry {
                child: Child::Custom(Box::new(router)),
                flags,
            },
        );
        self
    }

    /// Compile a mask with metadata and append the resulting route.
    ///
    /// # Errors
    ///
    /// Propagates mask compilation errors; the list is unchanged on error.
    pub fn add_route<I>(&mut self, mask: &str, metadata: I, flags: u8) -> Result<&mut Self, RouteError>
    where
        I: IntoIterator<Item = (String, ParamMeta)>,
    {
        let route = Route::new(mask, metadata)?;
        self.invalidate();
        self.entries.push(Entry {
            child: Child::Route(route),
            flags,
        });
        Ok(self)
    }

    /// Replace (`Some`) or delete (`None`) the router at `index`.
    ///
    /// # Errors
    ///
    /// [`RouteError::OutOfRange`] when `index` is past the end.
    pub fn modify(&mut self, index: usize, router: Option<Box<dyn Router>>) -> Result<(), RouteError> {
        if index >= self.entries.len() {
            return Err(RouteError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.invalidate();
        match router {
            Some(router) => self.entries[index].child = Child::Custom(router),
            None => {
                self.entries.remove(index);
            }
        }
        Ok(())
    }

    /// Create a nested list gated on a domain pattern and return it.
    ///
    /// The pattern may use `%tld%`/`%domain%`/`%sld%`; it is expanded
    /// against each request host and compared for equality.
    pub fn with_domain(&mut self, pattern: &str) -> &mut RouteList {
        self.invalidate();
        let mut child = RouteList::with_config(self.config);
        child.domain = Some(pattern.to_string());
        self.push_list(child)
    }

    /// Create a nested list scoped under a path prefix and return it.
    ///
    /// The prefix is normalised to end in `/` here, at registration;
    /// request paths are never rewritten to compensate.
    pub fn with_path(&mut self, prefix: &str) -> &mut RouteList {
        self.invalidate();
        let mut child = RouteList::with_config(self.config);
        let trimmed = prefix.trim_matches('/');
        if !trimmed.is_empty() {
            child.path_prefix = Some(format!("{}/", trimmed));
        }
        self.push_list(child)
    }

    fn push_list(&mut self, list: RouteList) -> &mut RouteList {
        self.entries.push(Entry {
            child: Child::List(Box::new(list)),
            flags: 0,
        });
        match &mut self.entries.last_mut().expect("entry just pushed").child {
            Child::List(list) => list,
            _ => unreachable!("entry just pushed is a nested list"),
        }
    }

    /// Build the dispatch cache now, recursively, so the list can be
    /// shared read-only afterwards.
    pub fn warmup_cache(&self) {
        let _ = self.ensure_cache();
    }

    /// Resolve a request through the children, first hit wins.
    pub fn match_url(&self, request: &RequestUrl) -> Option<Params> {
        if let Some(pattern) = &self.domain {
            let expanded = expand_domain(pattern, request.host());
            if !expanded.eq_ignore_ascii_case(request.host()) {
                debug!(
                    domain = pattern.as_str(),
                    host = request.host(),
                    "domain gate rejected request"
                );
                return None;
            }
        }
        let scoped;
        let request = match &self.path_prefix {
            Some(prefix) => {
                if !request.relative_path().starts_with(prefix.as_str()) {
                    debug!(
                        prefix = prefix.as_str(),
                        path = request.relative_path(),
                        "path gate rejected request"
                    );
                    return None;
                }
                scoped = request.with_base_path(&format!("{}{}", request.base_path(), prefix));
                &scoped
            }
            None => request,
        };
        for entry in &self.entries {
            if entry.one_way() {
                continue;
            }
            if let Some(params) = entry.router().match_url(request) {
                return Some(params);
            }
        }
        None
    }

    /// Construct a URL through the bucket of children eligible for
    /// `params[cache_key]`, first non-`None` wins.
    pub fn construct_url(&self, params: &Params, reference: &RefUrl) -> Option<String> {
        let adjusted = self.adjusted_reference(reference);
        let cache = self.ensure_cache();
        let bucket: &[usize] = match &cache.cache_key {
            Some(key) => match params.get(key).and_then(scalar_key) {
                Some(value) => cache
                    .ranks
                    .get(&value)
                    .map_or(cache.star.as_slice(), |bucket| bucket.as_slice()),
                None => &cache.star,
            },
            None => &cache.star,
        };
        for &index in bucket {
            if let Some(url) = self.entries[index].router().construct_url(params, &adjusted) {
                return Some(url);
            }
        }
        None
    }

    fn invalidate(&mut self) {
        *self.cache.get_mut().expect("dispatch cache lock poisoned") = None;
    }

    pub(super) fn ensure_cache(&self) -> Arc<DispatchCache> {
        if let Some(cache) = self
            .cache
            .read()
            .expect("dispatch cache lock poisoned")
            .as_ref()
        {
            return cache.clone();
        }
        let built = Arc::new(build(&self.entries));
        let mut guard = self.cache.write().expect("dispatch cache lock poisoned");
        if guard.is_none() {
            *guard = Some(built);
        }
        guard.as_ref().expect("cache just stored").clone()
    }

    /// The reference URL with this list's domain and path adjustments
    /// applied, memoised per reference.
    fn adjusted_reference(&self, reference: &RefUrl) -> RefUrl {
        if self.domain.is_none() && self.path_prefix.is_none() {
            return reference.clone();
        }
        if self.config.ref_cache_capacity > 0 {
            if let Some(hit) = self
                .ref_memo
                .read()
                .expect("reference memo lock poisoned")
                .get(reference)
            {
                return hit.clone();
            }
        }
        let mut adjusted = reference.clone();
        if let Some(pattern) = &self.domain {
            adjusted = adjusted.with_host(&expand_domain(pattern, reference.host()));
        }
        if let Some(prefix) = &self.path_prefix {
            adjusted = adjusted.with_path(&format!("{}{}", adjusted.base_path(), prefix));
        }
        if self.config.ref_cache_capacity > 0 {
            let mut memo = self.ref_memo.write().expect("reference memo lock poisoned");
            if memo.len() >= self.config.ref_cache_capacity {
                memo.clear();
            }
            memo.insert(reference.clone(), adjusted.clone());
        }
        adjusted
    }
}

impl Router for RouteList {
    fn match_url(&self, request: &RequestUrl) -> Option<Params> {
        RouteList::match_url(self, request)
    }

    fn construct_url(&self, params: &Params, reference: &RefUrl) -> Option<String> {
        RouteList::construct_url(self, params, reference)
    }

    fn warmup(&self) {
        self.warmup_cache();
    }
}
