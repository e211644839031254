//! Content domain - learning material published by staff
//!
//! Documents, courses, quizzes, tests, videos and certifications. Everything
//! here is created from the admin area and records the staff username that
//! created it.

pub mod data;
pub mod models;
pub mod questions;

pub use data::*;
pub use models::*;
pub use questions::{parse_questions, QuestionDraft};
