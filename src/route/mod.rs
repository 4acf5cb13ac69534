//! # Route Module
//!
//! A [`Route`] is one compiled mask plus metadata: per-parameter defaults,
//! pattern overrides and filters, route-level constant parameters, and an
//! optional pair of whole-mapping filters.
//!
//! ## Overview
//!
//! A route works in both directions:
//!
//! - [`Route::match_url`] tests an inbound request against the mask and,
//!   on success, returns the full parameter mapping: every placeholder's
//!   resolved value, defaults for absent placeholders, constant
//!   parameters, and residual query parameters.
//! - [`Route::construct_url`] renders an absolute URL from a parameter
//!   mapping and a reference URL, eliding parameters that sit at their
//!   defaults and turning leftovers into the query string.
//!
//! Both directions fail silently with `None`; only registration
//! ([`Route::new`]) reports errors.
//!
//! ## Example
//!
//! ```rust
//! use maskroute::{ParamMeta, RefUrl, RequestUrl, Route};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), maskroute::RouteError> {
//! let route = Route::new(
//!     "<presenter>/<action>[/<id \\d+>]",
//!     vec![
//!         ("presenter".to_string(), ParamMeta::value(json!("home"))),
//!         ("action".to_string(), ParamMeta::value(json!("default"))),
//!     ],
//! )?;
//!
//! let request = RequestUrl::parse("http://example.com/product/detail/42").unwrap();
//! let params = route.match_url(&request).expect("URL matches the mask");
//! assert_eq!(params.get("id"), Some(&json!("42")));
//!
//! let reference = RefUrl::new("http", "example.com", "/");
//! let url = route.construct_url(&params, &reference);
//! assert_eq!(url.as_deref(), Some("http://example.com/product/detail/42"));
//! # Ok(())
//! # }
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{ParamMeta, Route};
