//! Programs domain - scheduled community programs and events

pub mod data;
pub mod models;

pub use data::ProgramForm;
pub use models::{CreateProgram, Program};
