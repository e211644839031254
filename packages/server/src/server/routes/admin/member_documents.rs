use axum::extract::Path;

use crate::domains::membership::{DocumentType, MemberDocument};
use crate::server::error::{AppError, AppResult};
use crate::server::extractors::StaffContext;
use crate::server::routes::admin::{admin_body, parse_id};
use crate::server::routes::files::download as send_file;
use crate::server::views::{datetime, empty, escape, file_size, multiline};

pub async fn list(staff: StaffContext) -> AppResult {
    let documents = MemberDocument::find_all(staff.page.db()).await?;
    let rows = if documents.is_empty() {
        empty("No member documents have been uploaded.")
    } else {
        let rows: String = documents
            .iter()
            .map(|d| {
                format!(
                    r#"<tr><td><a href="/admin/member-documents/{}">{}</a></td><td>{}<br><small>{}</small></td><td>{}</td><td>{}</td></tr>"#,
                    d.document.id,
                    escape(&d.document.file.original_name),
                    escape(&d.participant_name),
                    escape(&d.participant_email),
                    escape(DocumentType::label_for(&d.document.document_type)),
                    datetime(d.document.uploaded_at)
                )
            })
            .collect();
        format!("<table><thead><tr><th>File</th><th>Participant</th><th>Type</th><th>Uploaded</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let body = admin_body(format!("<h1>Member documents</h1>{rows}"));
    Ok(staff.page.render("Member documents", body).await)
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let found = match parse_id(&id) {
        Some(id) => MemberDocument::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let Some(found) = found else {
        return Ok(staff
            .page
            .error("Document not found.", "/admin/member-documents")
            .await);
    };
    let doc = &found.document;

    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{name}</h1>
<dl>
<dt>Participant</dt><dd>{participant} &lt;{email}&gt;</dd>
<dt>Document type</dt><dd>{kind}</dd>
<dt>Uploaded</dt><dd>{uploaded}</dd>
<dt>Size</dt><dd>{size}</dd>
<dt>SHA-256</dt><dd><code>{sha}</code></dd>
</dl>
<p>{description}</p>
<p><a class="button" href="/admin/member-documents/{id}/file">Download</a></p>
<p><a href="/admin/member-documents">Back to member documents</a></p>
</article>"#,
        name = escape(&doc.file.original_name),
        participant = escape(&found.participant_name),
        email = escape(&found.participant_email),
        kind = escape(DocumentType::label_for(&doc.document_type)),
        uploaded = datetime(doc.uploaded_at),
        size = file_size(doc.file.size_bytes),
        sha = escape(&doc.file.sha256),
        description = multiline(&doc.description),
        id = doc.id,
    ));
    Ok(staff.page.render(&doc.file.original_name, body).await)
}

pub async fn download(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let found = match parse_id(&id) {
        Some(id) => MemberDocument::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let found = found.ok_or(AppError::NotFound)?;
    tracing::info!(
        document_id = %found.document.id,
        staff = %staff.user.username,
        "Member document downloaded"
    );
    send_file(staff.page.files(), &found.document.file).await
}
