use serde_json::Value;
use smallvec::SmallVec;

/// Maximum number of parameters stored inline before heap allocation.
///
/// Most routes resolve to a handful of parameters (presenter, action, an id
/// or two, a few query leftovers), so the backing store is stack-allocated
/// up to this size.
pub const MAX_INLINE_PARAMS: usize = 8;

/// An insertion-ordered parameter mapping.
///
/// Keys are parameter names, values are [`serde_json::Value`]s. Scalars
/// (`String`, `Number`, `Bool`) are what routes produce and consume;
/// `Null` marks a parameter that is known but absent (an optional
/// placeholder that did not appear in the URL); arrays and objects may be
/// carried through by callers but are never emitted into a URL path.
///
/// Lookup is linear over a small vector, which beats hashing at the sizes
/// routing actually sees. Insertion keeps the first-written position of a
/// key, so query strings built from leftovers come out in a stable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: SmallVec<[(String, Value); MAX_INLINE_PARAMS]>,
}

impl Params {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter by name.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Insert a parameter, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove a parameter, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Whether a parameter of this name is present (even as `Null`).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Number of entries, `Null` entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the mapping as a JSON object.
    ///
    /// Used by the CLI and by diagnostics; note that `serde_json` objects
    /// sort keys, so insertion order is not preserved in the output.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: Into<String>> Extend<(K, Value)> for Params {
    fn extend<T: IntoIterator<Item = (K, Value)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Whether a value is a scalar in routing terms.
///
/// Scalars can appear in a URL path and can pin a dispatch-cache bucket;
/// `Null`, arrays and objects cannot.
#[inline]
#[must_use]
pub fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Number(_) | Value::Bool(_)
    )
}

/// Render a scalar as the string that would appear in a URL.
///
/// Returns `None` for non-scalars; strings pass through unquoted.
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Compare two values the way URL round-tripping does.
///
/// `"42"` and `42` are the same parameter once they have been through a
/// URL, so equality is checked on the string rendering when the strict
/// comparison fails.
#[must_use]
pub fn values_equivalent(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (scalar_to_string(a), scalar_to_string(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_replaces_in_place() {
        let mut p = Params::new();
        p.insert("a", json!("1"));
        p.insert("b", json!("2"));
        p.insert("a", json!("3"));
        assert_eq!(p.len(), 2);
        assert_eq!(p.get("a"), Some(&json!("3")));
        let order: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn null_entries_are_present() {
        let mut p = Params::new();
        p.insert("id", Value::Null);
        assert!(p.contains("id"));
        assert_eq!(p.get("id"), Some(&Value::Null));
    }

    #[test]
    fn scalar_checks() {
        assert!(is_scalar(&json!("x")));
        assert!(is_scalar(&json!(7)));
        assert!(is_scalar(&json!(true)));
        assert!(!is_scalar(&Value::Null));
        assert!(!is_scalar(&json!([1, 2])));
        assert!(values_equivalent(&json!(42), &json!("42")));
        assert!(!values_equivalent(&json!("a"), &json!("b")));
    }
}
