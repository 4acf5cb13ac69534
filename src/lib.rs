pub mod cli;
pub mod domain;
mod error;
pub mod filter;
pub mod list;
pub mod mask;
mod params;
pub mod route;
pub mod router;
pub mod runtime_config;
pub mod table;
pub mod urls;

pub use error::RouteError;
pub use list::{RouteList, ONE_WAY};
pub use mask::Mask;
pub use params::{is_scalar, scalar_to_string, values_equivalent, Params, MAX_INLINE_PARAMS};
pub use route::{ParamMeta, Route};
pub use router::Router;
pub use urls::{RefUrl, RequestUrl};
