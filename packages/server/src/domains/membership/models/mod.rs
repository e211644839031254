pub mod member_document;

pub use member_document::*;
