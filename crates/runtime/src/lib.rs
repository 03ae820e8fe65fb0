pub mod backend;
pub mod client;
pub mod error;
pub mod task;

pub use backend::*;
pub use client::*;
pub use error::*;
pub use task::*;
