//! # CLI Module
//!
//! Command-line inspection tools for route tables:
//!
//! - `check` compiles every mask in a table and reports the first problem
//! - `resolve` matches a URL against a table and prints the parameters
//! - `build` constructs a URL from `key=value` parameters
//!
//! The binary is a thin wrapper over the library; everything it does is
//! available programmatically through [`crate::table`].

mod commands;

pub use commands::{run_cli, Cli, Commands};
