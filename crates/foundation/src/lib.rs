pub mod bounds;
pub mod error;
pub mod math;
pub mod point;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use error::*;
pub use point::*;
