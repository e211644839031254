//! Participants domain - families registered with the organization

pub mod data;
pub mod models;

pub use data::ParticipantForm;
pub use models::{CreateParticipant, Participant};
