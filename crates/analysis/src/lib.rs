//! Analysis requests anchored on a selected map region.
//!
//! - `session`: weather analysis and forecast jobs driven through
//!   [`runtime::TaskClient`], mapped into domain summaries.
//! - `population`: the synchronous population query.
//! - `http`: the reqwest-backed [`runtime::TaskBackend`].
//! - `config`: client settings read from the environment.

pub mod config;
pub mod error;
pub mod http;
pub mod population;
pub mod session;
pub mod summary;

pub use config::*;
pub use error::*;
pub use http::*;
pub use population::*;
pub use session::*;
pub use summary::*;
