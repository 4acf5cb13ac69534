//! # Route Table Module
//!
//! Declarative route tables: a YAML or JSON document describing a
//! [`RouteList`](crate::RouteList), for setups where the routing scheme is
//! configuration rather than code. Filters are code and cannot be
//! expressed in a table; everything else (masks, defaults, per-parameter
//! patterns, one-way flags, nested domain and path scopes) can.
//!
//! ## Document shape
//!
//! ```yaml
//! routes:
//!   - mask: "<presenter>/<action>[/<id \\d+>]"
//!     defaults: { presenter: home, action: default }
//!   - mask: "rss.xml"
//!     defaults: { presenter: feed }
//!     one_way: true
//! groups:
//!   - domain: "%sld%.example.com"
//!     routes:
//!       - mask: "<presenter>"
//!   - path: /admin
//!     routes:
//!       - mask: "<presenter>/<action>"
//!         patterns: { action: "[a-z]+" }
//! ```
//!
//! [`load_table`] reads a file (extension decides the format), assembles
//! the list and warms its dispatch cache, so the result is ready for
//! read-only sharing.

mod load;
mod types;

pub use self::load::{build_list, load_table};
pub use self::types::{TableDoc, TableGroup, TableRoute};
