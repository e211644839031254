use axum::{extract::Path, response::Response, Form};
use tracing::info;

use crate::common::FormErrors;
use crate::domains::content::{Course, CourseForm, CourseLevel};
use crate::server::error::AppResult;
use crate::server::extractors::StaffContext;
use crate::server::routes::admin::{admin_body, created_line, parse_id};
use crate::server::views::{empty, escape, forms, multiline};

pub async fn list(staff: StaffContext) -> AppResult {
    let courses = Course::find_all(staff.page.db()).await?;
    let rows = if courses.is_empty() {
        empty("No courses yet.")
    } else {
        let rows: String = courses
            .iter()
            .map(|c| {
                format!(
                    r#"<tr><td><a href="/admin/courses/{}">{}</a></td><td>{}</td><td>{}</td></tr>"#,
                    c.id,
                    escape(&c.title),
                    escape(&c.level),
                    escape(&c.duration)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Title</th><th>Level</th><th>Duration</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let body = admin_body(format!(
        r#"<h1>Courses</h1><p><a class="button" href="/admin/courses/new">New course</a></p>{rows}"#
    ));
    Ok(staff.page.render("Courses", body).await)
}

fn form_body(form: &CourseForm, errors: &FormErrors) -> String {
    let levels = CourseLevel::ALL.map(|l| (l.as_str(), l.as_str()));
    let selected = if form.level.is_empty() {
        CourseLevel::default().as_str()
    } else {
        form.level.as_str()
    };
    let fields = [
        forms::input("Title", "title", "text", &form.title, errors),
        forms::textarea("Description", "description", &form.description, errors),
        forms::textarea("Content", "content", &form.content, errors),
        forms::input("Duration (e.g. 4 weeks)", "duration", "text", &form.duration, errors),
        forms::select("Level", "level", levels, selected, errors),
    ]
    .concat();
    admin_body(format!(
        "<h1>New course</h1>{}",
        forms::form("/admin/courses/new", false, &fields, "Save course")
    ))
}

pub async fn new_form(staff: StaffContext) -> Response {
    staff
        .page
        .render("New course", form_body(&CourseForm::default(), &FormErrors::new()))
        .await
}

pub async fn create(staff: StaffContext, Form(form): Form<CourseForm>) -> AppResult {
    match form.validate() {
        Ok(input) => {
            let course = Course::create(input, &staff.user.username, staff.page.db()).await?;
            info!(course_id = %course.id, "Course created");
            Ok(staff
                .page
                .success(
                    "Course created successfully!",
                    &format!("/admin/courses/{}", course.id),
                )
                .await)
        }
        Err(errors) => {
            staff.page.session.error("Please correct the errors below.").await;
            Ok(staff.page.render("New course", form_body(&form, &errors)).await)
        }
    }
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let course = match parse_id(&id) {
        Some(id) => Course::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let Some(course) = course else {
        return Ok(staff.page.error("Course not found.", "/admin/courses").await);
    };

    let duration = if course.duration.is_empty() {
        String::new()
    } else {
        format!(" &middot; {}", escape(&course.duration))
    };
    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{title}</h1>
<p class="meta">{level}{duration}</p>
{created}
<p>{description}</p>
<h2>Course content</h2>
<div class="content">{content}</div>
<p><a href="/admin/courses">Back to courses</a></p>
</article>"#,
        title = escape(&course.title),
        level = escape(&course.level),
        created = created_line(&course.created_by, course.created_at),
        description = multiline(&course.description),
        content = multiline(&course.content),
    ));
    Ok(staff.page.render(&course.title, body).await)
}
