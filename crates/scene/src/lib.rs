pub mod drawing;
pub mod region;
pub mod selection;

pub use drawing::*;
pub use region::*;
pub use selection::*;
