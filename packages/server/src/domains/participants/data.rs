use serde::Deserialize;

use super::models::CreateParticipant;
use crate::common::FormErrors;

/// Participant registration form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParticipantForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub children_ages: String,
}

impl ParticipantForm {
    pub fn validate(&self) -> Result<CreateParticipant, FormErrors> {
        let mut errors = FormErrors::new();
        errors.text("name", &self.name, 200);
        errors.email("email", &self.email);
        errors.text("phone", &self.phone, 20);
        errors.text("children_ages", &self.children_ages, 200);

        errors.finish(|| CreateParticipant {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            children_ages: self.children_ages.trim().to_string(),
        })
    }
}
