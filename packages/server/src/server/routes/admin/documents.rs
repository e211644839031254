use axum::{extract::Path, response::Response, Form};
use tracing::info;

use crate::common::FormErrors;
use crate::domains::content::{Document, DocumentForm};
use crate::server::error::AppResult;
use crate::server::extractors::StaffContext;
use crate::server::routes::admin::{admin_body, created_line, parse_id};
use crate::server::views::{empty, escape, forms, multiline};

pub async fn list(staff: StaffContext) -> AppResult {
    let documents = Document::find_all(staff.page.db()).await?;
    let rows = if documents.is_empty() {
        empty("No documents yet.")
    } else {
        let rows: String = documents
            .iter()
            .map(|d| {
                format!(
                    r#"<tr><td><a href="/admin/documents/{}">{}</a></td><td>{}</td><td>{}</td></tr>"#,
                    d.id,
                    escape(&d.title),
                    escape(&d.category),
                    escape(&d.created_by)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Title</th><th>Category</th><th>Added by</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let body = admin_body(format!(
        r#"<h1>Documents</h1><p><a class="button" href="/admin/documents/new">New document</a></p>{rows}"#
    ));
    Ok(staff.page.render("Documents", body).await)
}

fn form_body(form: &DocumentForm, errors: &FormErrors) -> String {
    let fields = [
        forms::input("Title", "title", "text", &form.title, errors),
        forms::input("Category", "category", "text", &form.category, errors),
        forms::textarea("Content", "content", &form.content, errors),
    ]
    .concat();
    admin_body(format!(
        "<h1>New document</h1>{}",
        forms::form("/admin/documents/new", false, &fields, "Save document")
    ))
}

pub async fn new_form(staff: StaffContext) -> Response {
    let form = DocumentForm {
        category: "General".to_string(),
        ..Default::default()
    };
    staff
        .page
        .render("New document", form_body(&form, &FormErrors::new()))
        .await
}

pub async fn create(staff: StaffContext, Form(form): Form<DocumentForm>) -> AppResult {
    match form.validate() {
        Ok(input) => {
            let document = Document::create(input, &staff.user.username, staff.page.db()).await?;
            info!(document_id = %document.id, "Document created");
            Ok(staff
                .page
                .success(
                    "Document created successfully!",
                    &format!("/admin/documents/{}", document.id),
                )
                .await)
        }
        Err(errors) => {
            staff.page.session.error("Please correct the errors below.").await;
            Ok(staff.page.render("New document", form_body(&form, &errors)).await)
        }
    }
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let document = match parse_id(&id) {
        Some(id) => Document::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let Some(document) = document else {
        return Ok(staff.page.error("Document not found.", "/admin/documents").await);
    };

    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{title}</h1>
<p class="meta">Category: {category}</p>
{created}
<div class="content">{content}</div>
<p><a href="/admin/documents">Back to documents</a></p>
</article>"#,
        title = escape(&document.title),
        category = escape(&document.category),
        created = created_line(&document.created_by, document.created_at),
        content = multiline(&document.content),
    ));
    Ok(staff.page.render(&document.title, body).await)
}
