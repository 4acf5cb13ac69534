use std::path::Path;

use anyhow::Context;
use tracing::info;

use super::types::{TableDoc, TableGroup, TableRoute};
use crate::list::{RouteList, ONE_WAY};
use crate::route::ParamMeta;

/// Load a route table from a YAML or JSON file.
///
/// The extension decides the format (`.yaml`/`.yml` vs anything else).
/// The returned list has a warm dispatch cache and is ready for
/// read-only sharing.
///
/// # Errors
///
/// Returns an error when the file cannot be read, the document does not
/// deserialise, or any mask in it fails to compile; the error names the
/// offending route.
pub fn load_table(path: &Path) -> anyhow::Result<RouteList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading route table {}", path.display()))?;
    let doc: TableDoc = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("parsing route table {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("parsing route table {}", path.display()))?,
    };
    let list = build_list(&doc)?;
    info!(
        table = %path.display(),
        routers = list.len(),
        "route table loaded"
    );
    Ok(list)
}

/// Assemble a parsed table document into a warmed [`RouteList`].
pub fn build_list(doc: &TableDoc) -> anyhow::Result<RouteList> {
    let mut list = RouteList::new();
    add_routes(&mut list, &doc.routes)?;
    for group in &doc.groups {
        fill_group(&mut list, group)?;
    }
    list.warmup_cache();
    Ok(list)
}

fn add_routes(list: &mut RouteList, routes: &[TableRoute]) -> anyhow::Result<()> {
    for route in routes {
        let flags = if route.one_way { ONE_WAY } else { 0 };
        list.add_route(&route.mask, route_metadata(route), flags)
            .with_context(|| format!("registering route '{}'", route.mask))?;
    }
    Ok(())
}

fn fill_group(parent: &mut RouteList, group: &TableGroup) -> anyhow::Result<()> {
    let scoped: &mut RouteList = match (&group.domain, &group.path) {
        (Some(domain), Some(path)) => parent.with_domain(domain).with_path(path),
        (Some(domain), None) => parent.with_domain(domain),
        (None, Some(path)) => parent.with_path(path),
        (None, None) => parent,
    };
    add_routes(scoped, &group.routes)?;
    for nested in &group.groups {
        fill_group(scoped, nested)?;
    }
    Ok(())
}

/// Merge the `defaults` and `patterns` sections of a table entry into the
/// metadata shape `Route::new` expects.
fn route_metadata(route: &TableRoute) -> Vec<(String, ParamMeta)> {
    let mut metadata: Vec<(String, ParamMeta)> = route
        .defaults
        .iter()
        .map(|(name, value)| {
            let mut meta = ParamMeta::value(value.clone());
            if let Some(pattern) = route.patterns.get(name) {
                meta = meta.with_pattern(pattern);
            }
            (name.clone(), meta)
        })
        .collect();
    for (name, pattern) in &route.patterns {
        if !route.defaults.contains_key(name) {
            metadata.push((name.clone(), ParamMeta::pattern(pattern)));
        }
    }
    metadata
}
