//! Admin forms for publishing content

use serde::Deserialize;

use super::models::{
    CourseLevel, CreateCertification, CreateCourse, CreateDocument, CreateQuiz, CreateTest,
    CreateVideo, VideoCategory,
};
use super::questions::parse_questions;
use crate::common::{CourseId, FormData, FormErrors};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentForm {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl DocumentForm {
    pub fn validate(&self) -> Result<CreateDocument, FormErrors> {
        let mut errors = FormErrors::new();
        errors.text("title", &self.title, 200);
        errors.required("content", &self.content);
        errors.max_len("category", &self.category, 100);

        let category = match self.category.trim() {
            "" => "General",
            other => other,
        };

        errors.finish(|| CreateDocument {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            category: category.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
    pub content: String,
    pub duration: String,
    pub level: String,
}

impl CourseForm {
    pub fn validate(&self) -> Result<CreateCourse, FormErrors> {
        let mut errors = FormErrors::new();
        errors.text("title", &self.title, 200);
        errors.required("description", &self.description);
        errors.required("content", &self.content);
        errors.max_len("duration", &self.duration, 50);

        let level = if self.level.trim().is_empty() {
            Some(CourseLevel::default())
        } else {
            let names = CourseLevel::ALL.map(|l| l.as_str());
            errors
                .choice("level", &self.level, &names)
                .and_then(|name| name.parse().ok())
        };

        match level {
            Some(level) => errors.finish(|| CreateCourse {
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                content: self.content.trim().to_string(),
                duration: self.duration.trim().to_string(),
                level,
            }),
            None => Err(errors),
        }
    }
}

/// Quiz form; questions use the numbered field protocol
pub fn validate_quiz(form: &FormData) -> Result<CreateQuiz, FormErrors> {
    let mut errors = FormErrors::new();
    errors.text("title", form.text("title"), 200);
    errors.required("description", form.text("description"));
    errors.max_len("time_limit", form.text("time_limit"), 50);
    let questions = parse_questions(form, false, &mut errors);

    errors.finish(|| CreateQuiz {
        title: form.text("title").to_string(),
        description: form.text("description").to_string(),
        time_limit: form.text("time_limit").to_string(),
        questions,
    })
}

/// Test form; like a quiz plus a passing score and per-question points
pub fn validate_test(form: &FormData) -> Result<CreateTest, FormErrors> {
    let mut errors = FormErrors::new();
    errors.text("title", form.text("title"), 200);
    errors.required("description", form.text("description"));
    errors.max_len("time_limit", form.text("time_limit"), 50);
    let passing_score = errors.int_in_range("passing_score", form.text("passing_score"), 70, 0, 100);
    let questions = parse_questions(form, true, &mut errors);

    match passing_score {
        Some(passing_score) => errors.finish(|| CreateTest {
            title: form.text("title").to_string(),
            description: form.text("description").to_string(),
            time_limit: form.text("time_limit").to_string(),
            passing_score,
            questions,
        }),
        None => Err(errors),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VideoForm {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub category: String,
}

impl VideoForm {
    pub fn validate(&self) -> Result<CreateVideo, FormErrors> {
        let mut errors = FormErrors::new();
        errors.text("title", &self.title, 200);
        errors.required("description", &self.description);
        errors.url("video_url", &self.video_url);
        errors.optional_url("thumbnail_url", &self.thumbnail_url);
        errors.max_len("duration", &self.duration, 50);

        let category = if self.category.trim().is_empty() {
            Some(VideoCategory::default())
        } else {
            let names = VideoCategory::ALL.map(|c| c.as_str());
            errors
                .choice("category", &self.category, &names)
                .and_then(|name| name.parse().ok())
        };

        match category {
            Some(category) => errors.finish(|| CreateVideo {
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                video_url: self.video_url.trim().to_string(),
                thumbnail_url: self.thumbnail_url.trim().to_string(),
                duration: self.duration.trim().to_string(),
                category,
            }),
            None => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CertificationForm {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub validity_period: String,
    pub associated_course: String,
}

impl CertificationForm {
    /// Shape validation only; the caller confirms the course exists.
    pub fn validate(&self) -> Result<CreateCertification, FormErrors> {
        let mut errors = FormErrors::new();
        errors.text("title", &self.title, 200);
        errors.required("description", &self.description);
        errors.required("requirements", &self.requirements);
        errors.max_len("validity_period", &self.validity_period, 100);

        let course = self.associated_course.trim();
        let associated_course_id = if course.is_empty() {
            None
        } else {
            match CourseId::parse(course) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add(
                        "associated_course",
                        "Select a valid choice. That choice is not one of the available choices.",
                    );
                    None
                }
            }
        };

        errors.finish(|| CreateCertification {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            requirements: self.requirements.trim().to_string(),
            validity_period: self.validity_period.trim().to_string(),
            associated_course_id,
        })
    }
}
