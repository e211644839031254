use serde::Deserialize;

use super::models::CreateProgram;
use crate::common::FormErrors;

/// New program form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgramForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

impl ProgramForm {
    pub fn validate(&self) -> Result<CreateProgram, FormErrors> {
        let mut errors = FormErrors::new();
        errors.text("title", &self.title, 200);
        errors.required("description", &self.description);
        let date = errors.date("date", &self.date);
        let time = errors.time("time", &self.time);
        errors.text("location", &self.location, 200);

        match (date, time) {
            (Some(date), Some(time)) => errors.finish(|| CreateProgram {
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                date,
                time,
                location: self.location.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}
