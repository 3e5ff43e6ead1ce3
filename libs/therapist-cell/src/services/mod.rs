pub mod distance;
pub mod roster;

pub use distance::*;
pub use roster::*;
