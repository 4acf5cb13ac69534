//! # Route List Module
//!
//! The broker: an ordered collection of routers behind one
//! [`Router`](crate::Router) face.
//!
//! ## Overview
//!
//! A [`RouteList`] dispatches in both directions:
//!
//! - **Inbound** (`match_url`): an optional domain gate and path gate run
//!   first; then children are tried in insertion order and the first
//!   non-`None` result wins. One-way children are skipped.
//! - **Outbound** (`construct_url`): children are bucketed by the value
//!   each fixes for the *cache key*: the constant parameter name with
//!   the most distinct values across children. Construction only visits
//!   the bucket matching `params[cache_key]`, falling back to the `*`
//!   bucket for absent, non-scalar or unknown values.
//!
//! ## Scoping
//!
//! [`RouteList::with_domain`] and [`RouteList::with_path`] create nested
//! lists gated on a host pattern (`%sld%.example.com`) or a path prefix
//! (`/admin`). Both return `&mut` to the nested list; when that borrow
//! ends, the parent binding is usable again: the borrow is the upward
//! relation, so the finished tree stays `Send + Sync` with top-down
//! ownership.
//!
//! ## Cache discipline
//!
//! The dispatch cache builds lazily on first construction and is dropped
//! by every mutation. Lazy building is race-safe (it sits behind a
//! read-write lock), but the recommended discipline is an eager
//! [`RouteList::warmup_cache`] at boot; afterwards the list is safe for
//! concurrent matching and construction.

mod cache;
mod core;

pub use self::core::{RouteList, ONE_WAY};
