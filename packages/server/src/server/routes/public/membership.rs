use axum::{extract::Multipart, response::Response};

use crate::common::{FormData, FormErrors};
use crate::domains::membership::{
    upload_member_document, DocumentType, MemberUploadForm, MembershipError,
};
use crate::server::error::{AppError, AppResult};
use crate::server::extractors::PageContext;
use crate::server::routes::files::read_multipart;
use crate::server::views::forms;

fn membership_body(fields: &FormData, errors: &FormErrors) -> String {
    let types = DocumentType::ALL.map(|t| (t.as_str(), t.label()));
    let selected = match fields.text("document_type") {
        "" => DocumentType::IdVerification.as_str(),
        other => other,
    };
    let form_fields = [
        forms::input("Your name", "participant_name", "text", fields.text("participant_name"), errors),
        forms::input("Email address", "participant_email", "email", fields.text("participant_email"), errors),
        forms::input("Phone", "participant_phone", "tel", fields.text("participant_phone"), errors),
        forms::input(
            "Children's ages",
            "participant_children_ages",
            "text",
            fields.text("participant_children_ages"),
            errors,
        ),
        forms::select("Document type", "document_type", types, selected, errors),
        forms::textarea("Description", "description", fields.text("description"), errors),
        forms::file("Document", "file", errors),
    ]
    .concat();

    format!(
        r#"<h1>Membership</h1>
<section>
<p>Membership gives families access to programs, resource referrals and
fund-supported services from our approved vendors.</p>
<h2>Pre-qualification documents</h2>
<p>Upload proof of identity, income or residence. Accepted formats: PDF,
images, Word, Excel, CSV and text files.</p>
{form}
</section>"#,
        form = forms::form("/membership/documents", true, &form_fields, "Upload document")
    )
}

pub async fn page(ctx: PageContext) -> Response {
    ctx.render("Membership", membership_body(&FormData::new(), &FormErrors::new()))
        .await
}

async fn redisplay(ctx: &PageContext, fields: &FormData, errors: &FormErrors) -> Response {
    if fields.text("participant_email").is_empty() {
        ctx.session.error("Please provide your email address.").await;
    } else {
        ctx.session.error("Please correct the errors below.").await;
    }
    ctx.render("Membership", membership_body(fields, errors)).await
}

pub async fn upload(ctx: PageContext, multipart: Multipart) -> AppResult {
    let form = read_multipart(multipart).await?;
    let file = form.file("file");

    let (input, file) = match (MemberUploadForm { fields: &form.fields }.validate(), file) {
        (Ok(input), Some(file)) => (input, file),
        (result, file) => {
            let mut errors = result.err().unwrap_or_default();
            if file.is_none() {
                errors.add("file", "This field is required.");
            }
            return Ok(redisplay(&ctx, &form.fields, &errors).await);
        }
    };

    let label = input.document_type.label();
    match upload_member_document(input, file, ctx.files(), ctx.db()).await {
        Ok(_) => Ok(ctx
            .success(
                format!("Document uploaded successfully! Your {label} has been received."),
                "/membership",
            )
            .await),
        Err(MembershipError::File(e)) if e.is_rejection() => {
            let mut errors = FormErrors::new();
            errors.add("file", e.to_string());
            Ok(redisplay(&ctx, &form.fields, &errors).await)
        }
        Err(MembershipError::File(e)) => Err(AppError::Internal(e.into())),
        Err(MembershipError::Internal(e)) => Err(AppError::Internal(e)),
    }
}
