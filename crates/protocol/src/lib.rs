//! JSON wire types for the analysis backend.
//!
//! - `task`: submit / progress envelopes of the asynchronous job routes
//!   (weather analysis, forecast).
//! - `population`: the synchronous population query.

pub mod population;
pub mod task;

pub use population::*;
pub use task::*;

use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
