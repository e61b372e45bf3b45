//! SQL text from entity metadata; identifiers come from code, values are always parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
