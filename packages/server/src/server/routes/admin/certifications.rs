use axum::{extract::Path, response::Response, Form};
use tracing::info;

use crate::common::FormErrors;
use crate::domains::content::{Certification, CertificationForm, Course};
use crate::server::error::AppResult;
use crate::server::extractors::{PageContext, StaffContext};
use crate::server::routes::admin::{admin_body, created_line, parse_id};
use crate::server::views::{empty, escape, forms, multiline};

const INVALID_COURSE: &str = "Select a valid choice. That choice is not one of the available choices.";

pub async fn list(staff: StaffContext) -> AppResult {
    let certifications = Certification::find_all(staff.page.db()).await?;
    let rows = if certifications.is_empty() {
        empty("No certifications yet.")
    } else {
        let rows: String = certifications
            .iter()
            .map(|c| {
                format!(
                    r#"<tr><td><a href="/admin/certifications/{}">{}</a></td><td>{}</td><td>{}</td></tr>"#,
                    c.certification.id,
                    escape(&c.certification.title),
                    escape(c.course_title.as_deref().unwrap_or("-")),
                    escape(&c.certification.validity_period)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Title</th><th>Course</th><th>Valid for</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let body = admin_body(format!(
        r#"<h1>Certifications</h1><p><a class="button" href="/admin/certifications/new">New certification</a></p>{rows}"#
    ));
    Ok(staff.page.render("Certifications", body).await)
}

async fn form_body(page: &PageContext, form: &CertificationForm, errors: &FormErrors) -> anyhow::Result<String> {
    let courses = Course::find_all(page.db()).await?;
    let ids: Vec<String> = courses.iter().map(|c| c.id.to_string()).collect();
    let options = std::iter::once(("", "No associated course")).chain(
        ids.iter()
            .zip(&courses)
            .map(|(id, course)| (id.as_str(), course.title.as_str())),
    );
    let fields = [
        forms::input("Title", "title", "text", &form.title, errors),
        forms::textarea("Description", "description", &form.description, errors),
        forms::textarea("Requirements", "requirements", &form.requirements, errors),
        forms::input("Validity period (e.g. 2 years)", "validity_period", "text", &form.validity_period, errors),
        forms::select("Associated course", "associated_course", options, form.associated_course.trim(), errors),
    ]
    .concat();
    Ok(admin_body(format!(
        "<h1>New certification</h1>{}",
        forms::form("/admin/certifications/new", false, &fields, "Save certification")
    )))
}

pub async fn new_form(staff: StaffContext) -> AppResult {
    let body = form_body(&staff.page, &CertificationForm::default(), &FormErrors::new()).await?;
    Ok(staff.page.render("New certification", body).await)
}

pub async fn create(staff: StaffContext, Form(form): Form<CertificationForm>) -> AppResult {
    let errors = match form.validate() {
        Ok(input) => {
            let course_exists = match input.associated_course_id {
                Some(course_id) => Course::find_by_id(course_id, staff.page.db()).await?.is_some(),
                None => true,
            };
            if course_exists {
                let certification =
                    Certification::create(input, &staff.user.username, staff.page.db()).await?;
                info!(certification_id = %certification.id, "Certification created");
                return Ok(staff
                    .page
                    .success(
                        "Certification created successfully!",
                        &format!("/admin/certifications/{}", certification.id),
                    )
                    .await);
            }
            let mut errors = FormErrors::new();
            errors.add("associated_course", INVALID_COURSE);
            errors
        }
        Err(errors) => errors,
    };

    staff.page.session.error("Please correct the errors below.").await;
    let body = form_body(&staff.page, &form, &errors).await?;
    Ok(staff.page.render("New certification", body).await)
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let found = match parse_id(&id) {
        Some(id) => Certification::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let Some(found) = found else {
        return Ok(staff
            .page
            .error("Certification not found.", "/admin/certifications")
            .await);
    };
    let cert = &found.certification;

    let course = match (&cert.associated_course_id, &found.course_title) {
        (Some(course_id), Some(title)) => format!(
            r#"<p class="meta">Course: <a href="/admin/courses/{}">{}</a></p>"#,
            course_id,
            escape(title)
        ),
        _ => String::new(),
    };
    let validity = if cert.validity_period.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="meta">Valid for {}</p>"#, escape(&cert.validity_period))
    };
    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{title}</h1>
{created}
{course}
{validity}
<p>{description}</p>
<h2>Requirements</h2>
<p>{requirements}</p>
<p><a href="/admin/certifications">Back to certifications</a></p>
</article>"#,
        title = escape(&cert.title),
        created = created_line(&cert.created_by, cert.created_at),
        description = multiline(&cert.description),
        requirements = multiline(&cert.requirements),
    ));
    Ok(staff.page.render(&cert.title, body).await)
}
