pub mod certification;
pub mod course;
pub mod document;
pub mod quiz;
pub mod test;
pub mod video;

pub use certification::*;
pub use course::*;
pub use document::*;
pub use quiz::*;
pub use test::*;
pub use video::*;
