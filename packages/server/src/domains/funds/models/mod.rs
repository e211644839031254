pub mod distribution;
pub mod donation;

pub use distribution::*;
pub use donation::*;
