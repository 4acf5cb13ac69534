//! # Filter Module
//!
//! User-supplied value transforms applied on the way in and on the way out
//! of a route.
//!
//! Two granularities exist:
//!
//! - **Per-parameter** filters transform a single matched path component
//!   ([`FilterIn`]) or a single outbound parameter value ([`FilterOut`]).
//! - **Whole-mapping** filters ([`MapFilter`]) run once per route, after
//!   the per-parameter inbound pass and before the per-parameter outbound
//!   pass, and may add, remove or rewrite any parameter.
//!
//! Every filter expresses rejection by returning `None`, which silently
//! fails the match or construction of the route it is attached to. Filters
//! are owned function objects registered at route construction and must be
//! `Send + Sync` so a finished routing table can be shared across threads.

mod core;

pub use self::core::{map_filter, FilterIn, FilterOut, MapFilter};
pub(crate) use self::core::{run_filter_in, run_filter_out};
