use axum::{
    extract::{Path, Query},
    response::Response,
    Form,
};
use tracing::info;

use crate::common::{FormData, FormErrors};
use crate::domains::content::questions::MAX_QUESTIONS;
use crate::domains::content::{points_to_pass, total_points, validate_test, Test};
use crate::server::error::AppResult;
use crate::server::extractors::StaffContext;
use crate::server::routes::admin::quizzes::{posted_slots, question_fields, question_list, SlotsQuery};
use crate::server::routes::admin::{admin_body, created_line, parse_id};
use crate::server::views::{empty, escape, forms, multiline};

pub async fn list(staff: StaffContext) -> AppResult {
    let tests = Test::find_all(staff.page.db()).await?;
    let rows = if tests.is_empty() {
        empty("No tests yet.")
    } else {
        let rows: String = tests
            .iter()
            .map(|s| {
                format!(
                    r#"<tr><td><a href="/admin/tests/{}">{}</a></td><td>{}</td><td>{}</td><td>{}%</td></tr>"#,
                    s.test.id,
                    escape(&s.test.title),
                    s.question_count,
                    s.total_points,
                    s.test.passing_score
                )
            })
            .collect();
        format!("<table><thead><tr><th>Title</th><th>Questions</th><th>Total points</th><th>Passing score</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let body = admin_body(format!(
        r#"<h1>Tests</h1><p><a class="button" href="/admin/tests/new">New test</a></p>{rows}"#
    ));
    Ok(staff.page.render("Tests", body).await)
}

fn form_body(form: &FormData, slots: i32, errors: &FormErrors) -> String {
    let passing_score = match form.text("passing_score") {
        "" => "70",
        other => other,
    };
    let fields = [
        forms::input("Title", "title", "text", form.text("title"), errors),
        forms::textarea("Description", "description", form.text("description"), errors),
        forms::input("Time limit (optional)", "time_limit", "text", form.text("time_limit"), errors),
        forms::input("Passing score (%)", "passing_score", "number", passing_score, errors),
        question_fields(form, slots, true, errors),
    ]
    .concat();
    admin_body(format!(
        r#"<h1>New test</h1>
<p>Leave a question blank to skip it. Need more slots? <a href="/admin/tests/new?questions={more}">Show {more}</a>.</p>
{}"#,
        forms::form("/admin/tests/new", false, &fields, "Save test"),
        more = (slots + 5).min(MAX_QUESTIONS),
    ))
}

pub async fn new_form(staff: StaffContext, Query(query): Query<SlotsQuery>) -> Response {
    staff
        .page
        .render("New test", form_body(&FormData::new(), query.slots(), &FormErrors::new()))
        .await
}

pub async fn create(staff: StaffContext, Form(pairs): Form<Vec<(String, String)>>) -> AppResult {
    let form = FormData::from_pairs(pairs);
    match validate_test(&form) {
        Ok(input) => {
            let questions = input.questions.len();
            let test = Test::create(input, &staff.user.username, staff.page.db()).await?;
            info!(test_id = %test.id, questions, "Test created");
            Ok(staff
                .page
                .success(
                    "Test created successfully!",
                    &format!("/admin/tests/{}", test.id),
                )
                .await)
        }
        Err(errors) => {
            staff.page.session.error("Please correct the errors below.").await;
            Ok(staff
                .page
                .render("New test", form_body(&form, posted_slots(&form), &errors))
                .await)
        }
    }
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let test = match parse_id(&id) {
        Some(id) => Test::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let Some(test) = test else {
        return Ok(staff.page.error("Test not found.", "/admin/tests").await);
    };
    let questions = Test::questions(test.id, staff.page.db()).await?;
    let total = total_points(&questions);

    let time_limit = if test.time_limit.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="meta">Time limit: {}</p>"#, escape(&test.time_limit))
    };
    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{title}</h1>
{created}
{time_limit}
<p class="meta">Passing score: {passing}% ({to_pass} of {total} points)</p>
<p>{description}</p>
<h2>Questions ({count})</h2>
{questions}
<p><a href="/admin/tests">Back to tests</a></p>
</article>"#,
        title = escape(&test.title),
        created = created_line(&test.created_by, test.created_at),
        passing = test.passing_score,
        to_pass = points_to_pass(total, test.passing_score),
        description = multiline(&test.description),
        count = questions.len(),
        questions = question_list(
            questions
                .iter()
                .map(|q| (q.question.as_str(), q.options(), q.correct_answer, Some(q.points)))
        ),
    ));
    Ok(staff.page.render(&test.title, body).await)
}
