use axum::{
    extract::{Multipart, Path},
    response::Response,
};
use tracing::info;

use crate::common::{FormData, FormErrors};
use crate::domains::participants::Participant;
use crate::domains::vault::{CreateVaultItem, VaultCategory, VaultItem, VaultItemForm};
use crate::server::error::{AppError, AppResult};
use crate::server::extractors::{PageContext, StaffContext};
use crate::server::routes::admin::{admin_body, parse_id};
use crate::server::routes::files::{download as send_file, read_multipart};
use crate::server::views::{datetime, empty, escape, file_size, forms, multiline};

const VAULT_BUCKET: &str = "vault";

pub async fn list(staff: StaffContext) -> AppResult {
    let items = VaultItem::find_all(staff.page.db()).await?;
    let rows = if items.is_empty() {
        empty("The vault is empty.")
    } else {
        let rows: String = items
            .iter()
            .map(|v| {
                format!(
                    r#"<tr><td><a href="/admin/vault/{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                    v.item.id,
                    escape(&v.item.title),
                    escape(VaultCategory::label_for(&v.item.category)),
                    escape(v.participant_name.as_deref().unwrap_or("-")),
                    datetime(v.item.uploaded_at)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Title</th><th>Category</th><th>Participant</th><th>Uploaded</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let body = admin_body(format!(
        r#"<h1>Vault</h1><p><a class="button" href="/admin/vault/new">Upload file</a></p>{rows}"#
    ));
    Ok(staff.page.render("Vault", body).await)
}

async fn form_body(page: &PageContext, fields: &FormData, errors: &FormErrors) -> anyhow::Result<String> {
    let participants = Participant::find_all(page.db()).await?;
    let ids: Vec<String> = participants.iter().map(|p| p.id.to_string()).collect();
    let participant_options = std::iter::once(("", "Not linked to a participant")).chain(
        ids.iter()
            .zip(&participants)
            .map(|(id, p)| (id.as_str(), p.name.as_str())),
    );
    let categories = VaultCategory::ALL.map(|c| (c.as_str(), c.label()));
    let category = match fields.text("category") {
        "" => VaultCategory::Other.as_str(),
        other => other,
    };
    let form_fields = [
        forms::input("Title", "title", "text", fields.text("title"), errors),
        forms::textarea("Description", "description", fields.text("description"), errors),
        forms::select("Category", "category", categories, category, errors),
        forms::select("Participant", "participant", participant_options, fields.text("participant"), errors),
        forms::file("File", "file", errors),
    ]
    .concat();
    Ok(admin_body(format!(
        "<h1>Upload to vault</h1>{}",
        forms::form("/admin/vault/new", true, &form_fields, "Upload")
    )))
}

async fn redisplay(staff: &StaffContext, fields: &FormData, errors: &FormErrors) -> AppResult {
    staff.page.session.error("Please correct the errors below.").await;
    let body = form_body(&staff.page, fields, errors).await?;
    Ok(staff.page.render("Upload to vault", body).await)
}

pub async fn new_form(staff: StaffContext) -> AppResult {
    let body = form_body(&staff.page, &FormData::new(), &FormErrors::new()).await?;
    Ok(staff.page.render("Upload to vault", body).await)
}

pub async fn create(staff: StaffContext, multipart: Multipart) -> AppResult {
    let form = read_multipart(multipart).await?;

    let (valid, upload) = match (VaultItemForm { fields: &form.fields }.validate(), form.file("file")) {
        (Ok(valid), Some(upload)) => (valid, upload),
        (result, upload) => {
            let mut errors = result.err().unwrap_or_default();
            if upload.is_none() {
                errors.add("file", "This field is required.");
            }
            return redisplay(&staff, &form.fields, &errors).await;
        }
    };

    if let Some(participant_id) = valid.participant_id {
        if Participant::find_by_id(participant_id, staff.page.db()).await?.is_none() {
            let mut errors = FormErrors::new();
            errors.add("participant", "Select a valid participant.");
            return redisplay(&staff, &form.fields, &errors).await;
        }
    }

    let file = match staff.page.files().save(VAULT_BUCKET, upload).await {
        Ok(file) => file,
        Err(e) if e.is_rejection() => {
            let mut errors = FormErrors::new();
            errors.add("file", e.to_string());
            return redisplay(&staff, &form.fields, &errors).await;
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    let storage_key = file.storage_key.clone();
    let created = VaultItem::create(
        CreateVaultItem {
            title: valid.title,
            description: valid.description,
            category: valid.category.as_str().to_string(),
            participant_id: valid.participant_id,
            file,
        },
        &staff.user.username,
        staff.page.db(),
    )
    .await;
    let item = match created {
        Ok(item) => item,
        Err(e) => {
            staff.page.files().discard(&storage_key).await;
            return Err(e.into());
        }
    };
    info!(vault_item_id = %item.id, size_bytes = item.file.size_bytes, "Vault item uploaded");

    Ok(staff
        .page
        .success("File added to the vault.", &format!("/admin/vault/{}", item.id))
        .await)
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let found = match parse_id(&id) {
        Some(id) => VaultItem::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let Some(found) = found else {
        return Ok(staff.page.error("Vault item not found.", "/admin/vault").await);
    };
    let item = &found.item;

    let participant = match (&item.participant_id, &found.participant_name) {
        (Some(_), Some(name)) => escape(name),
        _ => "-".to_string(),
    };
    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{title}</h1>
<dl>
<dt>Category</dt><dd>{category}</dd>
<dt>Participant</dt><dd>{participant}</dd>
<dt>File</dt><dd>{name} ({size})</dd>
<dt>Uploaded</dt><dd>{uploaded} by {uploaded_by}</dd>
</dl>
<p>{description}</p>
<p><a class="button" href="/admin/vault/{id}/file">Download</a></p>
<p><a href="/admin/vault">Back to the vault</a></p>
</article>"#,
        title = escape(&item.title),
        category = escape(VaultCategory::label_for(&item.category)),
        name = escape(&item.file.original_name),
        size = file_size(item.file.size_bytes),
        uploaded = datetime(item.uploaded_at),
        uploaded_by = escape(&item.uploaded_by),
        description = multiline(&item.description),
        id = item.id,
    ));
    Ok(staff.page.render(&item.title, body).await)
}

pub async fn download(staff: StaffContext, Path(id): Path<String>) -> Result<Response, AppError> {
    let found = match parse_id(&id) {
        Some(id) => VaultItem::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let found = found.ok_or(AppError::NotFound)?;
    send_file(staff.page.files(), &found.item.file).await
}
