use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::params::{is_scalar, scalar_to_string, Params};

/// Inbound per-parameter filter: raw matched path component → scalar.
///
/// Returning `None` rejects the match of the whole route.
pub type FilterIn = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Outbound per-parameter filter: parameter value → path component string.
///
/// Returning `None` fails the construction of the whole route.
pub type FilterOut = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Whole-mapping filter: runs over the complete parameter mapping.
///
/// Attached to a route, the inbound variant runs after placeholders,
/// defaults and constants have been assembled; the outbound variant runs
/// before any placeholder is rendered. Returning `None` rejects the match
/// or construction.
pub type MapFilter = Arc<dyn Fn(Params) -> Option<Params> + Send + Sync>;

/// Wrap a closure as a [`MapFilter`].
pub fn map_filter<F>(f: F) -> MapFilter
where
    F: Fn(Params) -> Option<Params> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Run the inbound pipeline for one matched path component.
///
/// Without a filter the raw component becomes a string value. A filter
/// result that is not a scalar is rejected: construction requires scalars,
/// so admitting it here would only defer the failure.
pub(crate) fn run_filter_in(
    filter: Option<&FilterIn>,
    name: &str,
    raw: &str,
) -> Option<Value> {
    match filter {
        None => Some(Value::String(raw.to_string())),
        Some(f) => match f(raw) {
            Some(value) if is_scalar(&value) => Some(value),
            Some(_) => {
                debug!(param = name, "filter-in produced a non-scalar, rejecting match");
                None
            }
            None => {
                debug!(param = name, raw, "filter-in rejected value");
                None
            }
        },
    }
}

/// Run the outbound pipeline for one parameter value.
pub(crate) fn run_filter_out(
    filter: Option<&FilterOut>,
    name: &str,
    value: &Value,
) -> Option<String> {
    match filter {
        None => scalar_to_string(value),
        Some(f) => {
            let rendered = f(value);
            if rendered.is_none() {
                debug!(param = name, "filter-out rejected value");
            }
            rendered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_passthrough() {
        assert_eq!(run_filter_in(None, "p", "abc"), Some(json!("abc")));
        assert_eq!(
            run_filter_out(None, "p", &json!(42)),
            Some("42".to_string())
        );
    }

    #[test]
    fn non_scalar_filter_result_rejects() {
        let f: FilterIn = Arc::new(|_raw| Some(json!(["not", "scalar"])));
        assert_eq!(run_filter_in(Some(&f), "p", "abc"), None);
    }

    #[test]
    fn rejection_propagates() {
        let f: FilterIn = Arc::new(|_raw| None);
        assert_eq!(run_filter_in(Some(&f), "p", "abc"), None);
        let g: FilterOut = Arc::new(|_value| None);
        assert_eq!(run_filter_out(Some(&g), "p", &json!("x")), None);
    }
}
