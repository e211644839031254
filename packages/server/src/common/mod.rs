// Common types and utilities shared across the application

pub mod entity_ids;
pub mod form;
pub mod id;

pub use entity_ids::*;
pub use form::{safe_redirect_target, FormData, FormErrors};
pub use id::Id;
