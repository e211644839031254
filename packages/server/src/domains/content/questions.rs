//! Multiple-choice questions submitted through numbered form fields.
//!
//! The quiz and test forms post `question_count` plus, for each `i` in
//! `1..=question_count`, the fields `question_i`, `option_i_1` through
//! `option_i_4`, `correct_i` and (tests only) `points_i`. A slot whose
//! question text is blank is skipped, which lets the page offer spare rows.

use serde::{Deserialize, Serialize};

use crate::common::{FormData, FormErrors};

/// Upper bound on question slots read from one submission
pub const MAX_QUESTIONS: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    /// Options 1-4; 3 and 4 may be empty
    pub options: [String; 4],
    pub correct_answer: i16,
    pub points: i32,
}

/// Read the question slots from `form`, recording problems in `errors`.
pub fn parse_questions(form: &FormData, with_points: bool, errors: &mut FormErrors) -> Vec<QuestionDraft> {
    let Some(count) = errors.int_in_range("question_count", form.text("question_count"), 0, 0, MAX_QUESTIONS)
    else {
        return Vec::new();
    };

    let mut drafts = Vec::new();
    for i in 1..=count {
        let question = form.text(&format!("question_{i}"));
        if question.is_empty() {
            continue;
        }

        let options = [1, 2, 3, 4].map(|n| form.text(&format!("option_{i}_{n}")).to_string());
        for (n, option) in options.iter().enumerate() {
            let field = format!("option_{i}_{}", n + 1);
            if n < 2 {
                errors.required(&field, option);
            }
            errors.max_len(&field, option, 200);
        }

        let correct_field = format!("correct_{i}");
        let correct = errors.int_in_range(&correct_field, form.text(&correct_field), 1, 1, 4);
        if let Some(correct) = correct {
            if options[(correct - 1) as usize].is_empty() {
                errors.add(&correct_field, "The correct answer must be one of the filled-in options.");
            }
        }

        let points = if with_points {
            let field = format!("points_{i}");
            errors.int_in_range(&field, form.text(&field), 1, 1, 1000)
        } else {
            Some(1)
        };

        if let (Some(correct), Some(points)) = (correct, points) {
            drafts.push(QuestionDraft {
                question: question.to_string(),
                options,
                correct_answer: correct as i16,
                points,
            });
        }
    }

    drafts
}
