use axum::{
    extract::{Path, Query},
    response::Response,
    Form,
};
use serde::Deserialize;
use tracing::info;

use crate::common::{FormData, FormErrors};
use crate::domains::content::questions::MAX_QUESTIONS;
use crate::domains::content::{validate_quiz, Quiz};
use crate::server::error::AppResult;
use crate::server::extractors::StaffContext;
use crate::server::routes::admin::{admin_body, created_line, parse_id};
use crate::server::views::{empty, escape, forms, multiline};

const DEFAULT_SLOTS: i32 = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SlotsQuery {
    /// Number of blank question slots to offer
    pub questions: Option<i32>,
}

impl SlotsQuery {
    pub fn slots(&self) -> i32 {
        self.questions.unwrap_or(DEFAULT_SLOTS).clamp(1, MAX_QUESTIONS)
    }
}

/// Slot count for a redisplayed form: what was posted, within bounds
pub(crate) fn posted_slots(form: &FormData) -> i32 {
    form.text("question_count")
        .parse::<i32>()
        .unwrap_or(DEFAULT_SLOTS)
        .clamp(1, MAX_QUESTIONS)
}

/// Numbered question slots, pre-filled from `form`
pub(crate) fn question_fields(form: &FormData, slots: i32, with_points: bool, errors: &FormErrors) -> String {
    let mut html = forms::hidden("question_count", &slots.to_string());
    for i in 1..=slots {
        let text = |name: String| form.text(&name).to_string();
        let correct = match form.text(&format!("correct_{i}")) {
            "" => "1".to_string(),
            other => other.to_string(),
        };
        let mut fieldset = [
            forms::input(
                &format!("Question {i}"),
                &format!("question_{i}"),
                "text",
                &text(format!("question_{i}")),
                errors,
            ),
            forms::input("Option 1", &format!("option_{i}_1"), "text", &text(format!("option_{i}_1")), errors),
            forms::input("Option 2", &format!("option_{i}_2"), "text", &text(format!("option_{i}_2")), errors),
            forms::input("Option 3 (optional)", &format!("option_{i}_3"), "text", &text(format!("option_{i}_3")), errors),
            forms::input("Option 4 (optional)", &format!("option_{i}_4"), "text", &text(format!("option_{i}_4")), errors),
            forms::select(
                "Correct answer",
                &format!("correct_{i}"),
                [("1", "Option 1"), ("2", "Option 2"), ("3", "Option 3"), ("4", "Option 4")],
                &correct,
                errors,
            ),
        ]
        .concat();
        if with_points {
            let points = match form.text(&format!("points_{i}")) {
                "" => "1".to_string(),
                other => other.to_string(),
            };
            fieldset.push_str(&forms::input("Points", &format!("points_{i}"), "number", &points, errors));
        }
        html.push_str(&format!(r#"<fieldset class="question"><legend>Question {i}</legend>{fieldset}</fieldset>"#));
    }
    html
}

/// Read-only question list; `points` is shown when present
pub(crate) fn question_list<'a>(
    questions: impl Iterator<Item = (&'a str, Vec<(i16, &'a str)>, i16, Option<i32>)>,
) -> String {
    let items: String = questions
        .map(|(question, options, correct, points)| {
            let options: String = options
                .iter()
                .map(|(n, text)| {
                    let class = if *n == correct { " class=\"correct\"" } else { "" };
                    format!("<li{class}>{}</li>", escape(text))
                })
                .collect();
            let points = points
                .map(|p| format!(r#" <span class="points">({p} pt{})</span>"#, if p == 1 { "" } else { "s" }))
                .unwrap_or_default();
            format!("<li><p>{}{points}</p><ol>{options}</ol></li>", escape(question))
        })
        .collect();
    if items.is_empty() {
        empty("No questions.")
    } else {
        format!(r#"<ol class="questions">{items}</ol>"#)
    }
}

pub async fn list(staff: StaffContext) -> AppResult {
    let quizzes = Quiz::find_all(staff.page.db()).await?;
    let rows = if quizzes.is_empty() {
        empty("No quizzes yet.")
    } else {
        let rows: String = quizzes
            .iter()
            .map(|s| {
                format!(
                    r#"<tr><td><a href="/admin/quizzes/{}">{}</a></td><td>{}</td><td>{}</td></tr>"#,
                    s.quiz.id,
                    escape(&s.quiz.title),
                    s.question_count,
                    escape(&s.quiz.time_limit)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Title</th><th>Questions</th><th>Time limit</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let body = admin_body(format!(
        r#"<h1>Quizzes</h1><p><a class="button" href="/admin/quizzes/new">New quiz</a></p>{rows}"#
    ));
    Ok(staff.page.render("Quizzes", body).await)
}

fn form_body(form: &FormData, slots: i32, errors: &FormErrors) -> String {
    let fields = [
        forms::input("Title", "title", "text", form.text("title"), errors),
        forms::textarea("Description", "description", form.text("description"), errors),
        forms::input("Time limit (optional)", "time_limit", "text", form.text("time_limit"), errors),
        question_fields(form, slots, false, errors),
    ]
    .concat();
    admin_body(format!(
        r#"<h1>New quiz</h1>
<p>Leave a question blank to skip it. Need more slots? <a href="/admin/quizzes/new?questions={more}">Show {more}</a>.</p>
{}"#,
        forms::form("/admin/quizzes/new", false, &fields, "Save quiz"),
        more = (slots + 5).min(MAX_QUESTIONS),
    ))
}

pub async fn new_form(staff: StaffContext, Query(query): Query<SlotsQuery>) -> Response {
    staff
        .page
        .render("New quiz", form_body(&FormData::new(), query.slots(), &FormErrors::new()))
        .await
}

pub async fn create(staff: StaffContext, Form(pairs): Form<Vec<(String, String)>>) -> AppResult {
    let form = FormData::from_pairs(pairs);
    match validate_quiz(&form) {
        Ok(input) => {
            let questions = input.questions.len();
            let quiz = Quiz::create(input, &staff.user.username, staff.page.db()).await?;
            info!(quiz_id = %quiz.id, questions, "Quiz created");
            Ok(staff
                .page
                .success(
                    "Quiz created successfully!",
                    &format!("/admin/quizzes/{}", quiz.id),
                )
                .await)
        }
        Err(errors) => {
            staff.page.session.error("Please correct the errors below.").await;
            Ok(staff
                .page
                .render("New quiz", form_body(&form, posted_slots(&form), &errors))
                .await)
        }
    }
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let quiz = match parse_id(&id) {
        Some(id) => Quiz::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let Some(quiz) = quiz else {
        return Ok(staff.page.error("Quiz not found.", "/admin/quizzes").await);
    };
    let questions = Quiz::questions(quiz.id, staff.page.db()).await?;

    let time_limit = if quiz.time_limit.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="meta">Time limit: {}</p>"#, escape(&quiz.time_limit))
    };
    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{title}</h1>
{created}
{time_limit}
<p>{description}</p>
<h2>Questions ({count})</h2>
{questions}
<p><a href="/admin/quizzes">Back to quizzes</a></p>
</article>"#,
        title = escape(&quiz.title),
        created = created_line(&quiz.created_by, quiz.created_at),
        description = multiline(&quiz.description),
        count = questions.len(),
        questions = question_list(
            questions
                .iter()
                .map(|q| (q.question.as_str(), q.options(), q.correct_answer, None))
        ),
    ));
    Ok(staff.page.render(&quiz.title, body).await)
}
