use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::info;

use super::core::Entry;

/// Outbound dispatch index over a list's children.
///
/// Bucket entries are child indices in insertion order. Every named
/// bucket is a superset of the star bucket: children that do not pin the
/// cache key are retroactively appended to each named bucket so a lookup
/// never has to consult two buckets.
pub(super) struct DispatchCache {
    /// Constant parameter name used as discriminator, if any candidate won
    pub cache_key: Option<String>,
    /// Children eligible per concrete discriminator value
    pub ranks: HashMap<String, Vec<usize>>,
    /// Children eligible when the value is absent, non-scalar or unknown
    pub star: Vec<usize>,
}

/// Canonical bucket key for a scalar value.
///
/// The kind prefix keeps `"1"` (string) and `1` (number) in different
/// buckets; `None` for non-scalars and `Null`.
pub(super) fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(format!("s:{}", s)),
        Value::Number(n) => Some(format!("n:{}", n)),
        Value::Bool(b) => Some(format!("b:{}", b)),
        _ => None,
    }
}

/// Build the dispatch cache for a list's children.
///
/// Child routers are warmed first so nested lists build their own caches
/// on the way. The cache key is chosen by voting: the constant parameter
/// name with the most distinct scalar values across non-one-way children,
/// ties broken by first occurrence. One-way children do not vote but do
/// occupy buckets: they are construction-only, and the buckets exist
/// for construction.
pub(super) fn build(entries: &[Entry]) -> DispatchCache {
    for entry in entries {
        entry.router().warmup();
    }

    let mut order: Vec<&str> = Vec::new();
    let mut distinct: HashMap<&str, HashSet<String>> = HashMap::new();
    for entry in entries {
        if entry.one_way() {
            continue;
        }
        let constants = match entry.router().constant_parameters() {
            Some(constants) => constants,
            None => continue,
        };
        for (name, value) in constants.iter() {
            if let Some(key) = scalar_key(value) {
                if !distinct.contains_key(name) {
                    order.push(name);
                }
                distinct.entry(name).or_default().insert(key);
            }
        }
    }

    let mut cache_key: Option<&str> = None;
    let mut best = 0usize;
    for name in &order {
        let count = distinct[name].len();
        if count > best {
            best = count;
            cache_key = Some(name);
        }
    }

    let mut ranks: HashMap<String, Vec<usize>> = HashMap::new();
    let mut star: Vec<usize> = Vec::new();
    match cache_key {
        Some(key) => {
            for entry in entries {
                if let Some(value) = pinned_value(entry, key) {
                    ranks.entry(value).or_default();
                }
            }
            for (index, entry) in entries.iter().enumerate() {
                match pinned_value(entry, key) {
                    Some(value) => ranks
                        .get_mut(&value)
                        .expect("bucket created in first pass")
                        .push(index),
                    None => {
                        star.push(index);
                        for bucket in ranks.values_mut() {
                            bucket.push(index);
                        }
                    }
                }
            }
        }
        None => star = (0..entries.len()).collect(),
    }

    info!(
        children = entries.len(),
        cache_key = ?cache_key,
        buckets = ranks.len(),
        "dispatch cache warmed"
    );
    DispatchCache {
        cache_key: cache_key.map(str::to_string),
        ranks,
        star,
    }
}

fn pinned_value(entry: &Entry, key: &str) -> Option<String> {
    entry
        .router()
        .constant_parameters()
        .and_then(|constants| constants.get(key))
        .and_then(scalar_key)
}
