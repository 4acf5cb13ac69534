use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;
use url::form_urlencoded;
use url::Url;

use crate::filter::{run_filter_in, run_filter_out, FilterIn, FilterOut, MapFilter};
use crate::mask::{Mask, ParamOverride, RenderCtx};
use crate::params::{is_scalar, scalar_to_string, values_equivalent, Params};
use crate::router::Router;
use crate::urls::{RefUrl, RequestUrl};
use crate::RouteError;

/// Per-parameter metadata attached to a route at registration.
///
/// The meaning of `value` depends on where the name appears: for a mask
/// placeholder it becomes the default, for a name the mask does not know
/// it becomes a constant parameter (fixed value, not part of the path,
/// visible to the broker for cache-key selection).
#[derive(Clone, Default)]
pub struct ParamMeta {
    /// Default (placeholder) or constant value (non-placeholder)
    pub value: Option<Value>,
    /// Regex fragment overriding the placeholder's pattern
    pub pattern: Option<String>,
    /// Marks `value` as fixed; a placeholder whose mask default disagrees
    /// with a fixed value is a registration error
    pub fixed: bool,
    /// Inbound transform for the matched path component
    pub filter_in: Option<FilterIn>,
    /// Outbound transform applied before the value is rendered
    pub filter_out: Option<FilterOut>,
}

impl ParamMeta {
    /// Metadata carrying a default or constant value.
    #[must_use]
    pub fn value(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// Metadata fixing a parameter to a value.
    #[must_use]
    pub fn constant(value: Value) -> Self {
        Self {
            value: Some(value),
            fixed: true,
            ..Self::default()
        }
    }

    /// Metadata carrying only a pattern override.
    #[must_use]
    pub fn pattern(pattern: &str) -> Self {
        Self {
            pattern: Some(pattern.to_string()),
            ..Self::default()
        }
    }

    /// Attach a pattern override.
    #[must_use]
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    /// Attach an inbound filter.
    #[must_use]
    pub fn with_filter_in<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.filter_in = Some(std::sync::Arc::new(filter));
        self
    }

    /// Attach an outbound filter.
    #[must_use]
    pub fn with_filter_out<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.filter_out = Some(std::sync::Arc::new(filter));
        self
    }
}

impl fmt::Debug for ParamMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamMeta")
            .field("value", &self.value)
            .field("pattern", &self.pattern)
            .field("fixed", &self.fixed)
            .field("filter_in", &self.filter_in.is_some())
            .field("filter_out", &self.filter_out.is_some())
            .finish()
    }
}

/// A single bidirectional route: one compiled mask plus metadata.
pub struct Route {
    mask: Mask,
    constants: Params,
    filters_in: Vec<Option<FilterIn>>,
    filters_out: Vec<Option<FilterOut>>,
    global_in: Option<MapFilter>,
    global_out: Option<MapFilter>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("mask", &self.mask.source())
            .field("constants", &self.constants)
            .finish()
    }
}

impl Route {
    /// Compile a mask and attach metadata.
    ///
    /// Metadata values become placeholder defaults or constant parameters
    /// (see [`ParamMeta`]); pattern overrides reshape the derived regex.
    ///
    /// # Errors
    ///
    /// Propagates mask compilation errors, and rejects with
    /// [`RouteError::DuplicateParameter`] a fixed metadata value that
    /// disagrees with the default the mask itself assigns to the same
    /// placeholder.
    pub fn new<I>(mask: &str, metadata: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (String, ParamMeta)>,
    {
        let metadata: Vec<(String, ParamMeta)> = metadata.into_iter().collect();
        let mut overrides = HashMap::new();
        for (name, meta) in &metadata {
            overrides.insert(
                name.clone(),
                ParamOverride {
                    pattern: meta.pattern.clone(),
                    default: meta.value.clone(),
                },
            );
        }
        let compiled = Mask::compile_with(mask, &overrides)?;

        let count = compiled.placeholders().len();
        let mut constants = Params::new();
        let mut filters_in = vec![None; count];
        let mut filters_out = vec![None; count];
        for (name, meta) in metadata {
            match compiled.placeholder_index(&name) {
                Some(index) => {
                    if meta.fixed {
                        let placeholder = &compiled.placeholders()[index];
                        if let (Some(mask_default), Some(value)) =
                            (&placeholder.mask_default, &meta.value)
                        {
                            if !values_equivalent(&Value::String(mask_default.clone()), value) {
                                return Err(RouteError::DuplicateParameter {
                                    mask: mask.to_string(),
                                    name,
                                });
                            }
                        }
                    }
                    filters_in[index] = meta.filter_in;
                    filters_out[index] = meta.filter_out;
                }
                None => {
                    if let Some(value) = meta.value {
                        constants.insert(name, value);
                    }
                }
            }
        }

        Ok(Self {
            mask: compiled,
            constants,
            filters_in,
            filters_out,
            global_in: None,
            global_out: None,
        })
    }

    /// Wrap an already compiled mask without metadata.
    #[must_use]
    pub fn from_mask(mask: Mask) -> Self {
        let count = mask.placeholders().len();
        Self {
            mask,
            constants: Params::new(),
            filters_in: vec![None; count],
            filters_out: vec![None; count],
            global_in: None,
            global_out: None,
        }
    }

    /// Attach a whole-mapping inbound filter, run after placeholders,
    /// defaults and constants are assembled.
    #[must_use]
    pub fn with_global_filter_in(mut self, filter: MapFilter) -> Self {
        self.global_in = Some(filter);
        self
    }

    /// Attach a whole-mapping outbound filter, run before any placeholder
    /// is rendered.
    #[must_use]
    pub fn with_global_filter_out(mut self, filter: MapFilter) -> Self {
        self.global_out = Some(filter);
        self
    }

    /// The compiled mask.
    #[must_use]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Parameters whose value is fixed by the metadata.
    #[must_use]
    pub fn constant_params(&self) -> &Params {
        &self.constants
    }

    fn is_own_param(&self, name: &str) -> bool {
        self.mask.placeholder_index(name).is_some() || self.constants.contains(name)
    }

    /// Match an inbound request against this route.
    ///
    /// Returns `None` when the host or path does not fit the mask, or when
    /// a filter rejects a value.
    pub fn match_url(&self, request: &RequestUrl) -> Option<Params> {
        let host_raw = if self.mask.is_absolute() {
            match self.mask.match_host(request.host()) {
                Some(raw) => Some(raw),
                None => {
                    debug!(
                        mask = %self.mask.source(),
                        host = request.host(),
                        "host does not match absolute mask"
                    );
                    return None;
                }
            }
        } else {
            None
        };

        let relative = request.relative_path();
        let mut raw = self.mask.match_relative_path(relative)?;
        if let Some(host_values) = host_raw {
            for (index, value) in host_values.into_iter().enumerate() {
                if value.is_some() {
                    raw[index] = value;
                }
            }
        }

        let mut params = Params::new();
        for (name, value) in request.query().iter() {
            if !self.is_own_param(name) {
                params.insert(name, value.clone());
            }
        }
        for (index, placeholder) in self.mask.placeholders().iter().enumerate() {
            let value = match &raw[index] {
                Some(component) => {
                    run_filter_in(self.filters_in[index].as_ref(), &placeholder.name, component)?
                }
                None => placeholder.default.clone().unwrap_or(Value::Null),
            };
            params.insert(placeholder.name.clone(), value);
        }
        for (name, value) in self.constants.iter() {
            params.insert(name, value.clone());
        }
        if let Some(filter) = &self.global_in {
            params = filter(params)?;
        }
        debug!(mask = %self.mask.source(), path = relative, "route matched");
        Some(params)
    }

    /// Construct an absolute URL from a parameter mapping.
    ///
    /// Returns `None` when a required placeholder cannot be satisfied,
    /// a supplied value fails its pattern, a constant parameter is
    /// contradicted, or a filter rejects a value.
    pub fn construct_url(&self, params: &Params, reference: &RefUrl) -> Option<String> {
        let mut working = params.clone();
        if let Some(filter) = &self.global_out {
            working = filter(working)?;
        }

        let count = self.mask.placeholders().len();
        let mut values: Vec<Option<String>> = vec![None; count];
        let mut defaults: Vec<Option<String>> = vec![None; count];
        let mut non_default = vec![false; count];
        for (index, placeholder) in self.mask.placeholders().iter().enumerate() {
            defaults[index] = placeholder.default.as_ref().and_then(scalar_to_string);
            let supplied = match working.remove(&placeholder.name) {
                Some(Value::Null) | None => None,
                Some(value) => Some(value),
            };
            if let Some(value) = supplied {
                if !is_scalar(&value) {
                    debug!(
                        mask = %self.mask.source(),
                        param = %placeholder.name,
                        "non-scalar value for a path parameter"
                    );
                    return None;
                }
                let at_default = placeholder
                    .default
                    .as_ref()
                    .is_some_and(|default| values_equivalent(default, &value));
                let rendered =
                    run_filter_out(self.filters_out[index].as_ref(), &placeholder.name, &value)?;
                if !placeholder.value_regex.is_match(&rendered) {
                    debug!(
                        mask = %self.mask.source(),
                        param = %placeholder.name,
                        value = %rendered,
                        "value does not round-trip through its pattern"
                    );
                    return None;
                }
                values[index] = Some(rendered);
                non_default[index] = !at_default;
            }
        }
        for (name, constant) in self.constants.iter() {
            if let Some(value) = working.remove(name) {
                if !value.is_null() && !values_equivalent(constant, &value) {
                    return None;
                }
            }
        }

        let ctx = RenderCtx {
            values: &values,
            defaults: &defaults,
            non_default: &non_default,
        };
        let relative = self.mask.build_relative_path(&ctx)?;
        let host = if self.mask.is_absolute() {
            self.mask.build_host(&ctx, reference.host())?
        } else {
            reference.host().to_string()
        };

        let mut path = reference.base_path().to_string();
        path.push_str(&relative);

        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (name, value) in working.iter() {
            if value.is_null() {
                continue;
            }
            let rendered = scalar_to_string(value)?;
            query.append_pair(name, &rendered);
            has_query = true;
        }

        let mut out = Url::parse(&format!("{}://{}", reference.scheme(), host)).ok()?;
        out.set_path(&path);
        if has_query {
            out.set_query(Some(&query.finish()));
        }
        Some(out.to_string())
    }
}

impl Router for Route {
    fn match_url(&self, request: &RequestUrl) -> Option<Params> {
        Route::match_url(self, request)
    }

    fn construct_url(&self, params: &Params, reference: &RefUrl) -> Option<String> {
        Route::construct_url(self, params, reference)
    }

    fn constant_parameters(&self) -> Option<&Params> {
        Some(&self.constants)
    }
}
