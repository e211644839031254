use axum::{
    extract::{Path, Query},
    response::Response,
    Form,
};

use crate::common::{FormErrors, VendorId};
use crate::domains::vendors::{review_vendor, RejectForm, ReviewDecision, VendorError, VendorStatus, VendorSubmission};
use crate::server::error::{AppError, AppResult};
use crate::server::extractors::StaffContext;
use crate::server::routes::admin::{admin_body, parse_id, status_filter, StatusQuery};
use crate::server::routes::files::download as send_file;
use crate::server::views::{datetime, empty, escape, file_size, forms, multiline, status_badge};

fn badge(vendor: &VendorSubmission) -> String {
    let status = vendor.status();
    status_badge(status.as_str(), status.label())
}

pub async fn list(staff: StaffContext, Query(query): Query<StatusQuery>) -> AppResult {
    let status = query.parse::<VendorStatus>();
    let vendors = VendorSubmission::find_all(status, staff.page.db()).await?;
    let rows = if vendors.is_empty() {
        empty("No vendor submissions.")
    } else {
        let rows: String = vendors
            .iter()
            .map(|v| {
                format!(
                    r#"<tr><td><a href="/admin/vendors/{}">{}</a></td><td>{}<br><small>{}</small></td><td>{}</td><td>{}</td></tr>"#,
                    v.id,
                    escape(&v.business_name),
                    escape(&v.contact_name),
                    escape(&v.email),
                    badge(v),
                    datetime(v.submitted_at)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Business</th><th>Contact</th><th>Status</th><th>Submitted</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let filters = status_filter(
        "/admin/vendors",
        status.map(|s| s.as_str()).unwrap_or(""),
        VendorStatus::ALL.map(|s| (s.as_str(), s.label())),
    );
    let body = admin_body(format!("<h1>Vendor submissions</h1>{filters}{rows}"));
    Ok(staff.page.render("Vendor submissions", body).await)
}

async fn find(staff: &StaffContext, id: &str) -> Result<Option<VendorSubmission>, AppError> {
    match parse_id(id) {
        Some(id) => Ok(VendorSubmission::find_by_id(id, staff.page.db()).await?),
        None => Ok(None),
    }
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let Some(vendor) = find(&staff, &id).await? else {
        return Ok(not_found(&staff).await);
    };

    let website = if vendor.website.is_empty() {
        "-".to_string()
    } else {
        format!(
            r#"<a href="{url}" rel="noopener" target="_blank">{url}</a>"#,
            url = escape(&vendor.website)
        )
    };
    let price_list = match vendor.price_list() {
        Some(file) => format!(
            r#"<a href="/admin/vendors/{}/price-list">{}</a> ({})"#,
            vendor.id,
            escape(&file.original_name),
            file_size(file.size_bytes)
        ),
        None => "Not provided".to_string(),
    };
    let review = match vendor.status() {
        VendorStatus::PendingReview => {
            let reject_fields = forms::textarea("Reason for rejection", "reason", "", &FormErrors::new());
            format!(
                r#"<section class="review">
<h2>Review</h2>
{approve}
{reject}
</section>"#,
                approve = forms::post_button(
                    &format!("/admin/vendors/{}/approve", vendor.id),
                    "Approve vendor",
                    "button"
                ),
                reject = forms::form(
                    &format!("/admin/vendors/{}/reject", vendor.id),
                    false,
                    &reject_fields,
                    "Reject vendor"
                ),
            )
        }
        status => {
            let by = vendor.reviewed_by.as_deref().unwrap_or("-");
            let at = vendor.reviewed_at.map(datetime).unwrap_or_default();
            let reason = if status == VendorStatus::Rejected && !vendor.rejection_reason.is_empty() {
                format!("<p><strong>Reason:</strong> {}</p>", multiline(&vendor.rejection_reason))
            } else {
                String::new()
            };
            format!(
                r#"<p class="meta">{} by {} on {}</p>{reason}"#,
                status.label(),
                escape(by),
                at
            )
        }
    };

    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{name} {badge}</h1>
<dl>
<dt>Contact</dt><dd>{contact}</dd>
<dt>Email</dt><dd>{email}</dd>
<dt>Phone</dt><dd>{phone}</dd>
<dt>Website</dt><dd>{website}</dd>
<dt>Price list</dt><dd>{price_list}</dd>
<dt>Submitted</dt><dd>{submitted}</dd>
</dl>
<h2>Services</h2>
<p>{services}</p>
{review}
<p><a href="/admin/vendors">Back to vendors</a></p>
</article>"#,
        name = escape(&vendor.business_name),
        badge = badge(&vendor),
        contact = escape(&vendor.contact_name),
        email = escape(&vendor.email),
        phone = escape(&vendor.phone),
        submitted = datetime(vendor.submitted_at),
        services = multiline(&vendor.services_description),
    ));
    Ok(staff.page.render(&vendor.business_name, body).await)
}

async fn not_found(staff: &StaffContext) -> Response {
    staff
        .page
        .error("Vendor submission not found.", "/admin/vendors")
        .await
}

async fn apply_review(staff: StaffContext, id: VendorId, decision: ReviewDecision) -> AppResult {
    let target = format!("/admin/vendors/{id}");
    match review_vendor(id, decision, &staff.user.username, staff.page.db()).await {
        Ok(vendor) => {
            let message = match vendor.status() {
                VendorStatus::Approved => format!("{} has been approved.", vendor.business_name),
                _ => format!("{} has been rejected.", vendor.business_name),
            };
            Ok(staff.page.success(message, &target).await)
        }
        Err(VendorError::NotFound) => Ok(not_found(&staff).await),
        Err(e @ VendorError::AlreadyReviewed(_)) => Ok(staff.page.error(e.to_string(), &target).await),
        Err(e) => Err(AppError::Internal(e.into())),
    }
}

pub async fn approve(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let Some(id) = parse_id(&id) else {
        return Ok(not_found(&staff).await);
    };
    apply_review(staff, id, ReviewDecision::Approve).await
}

pub async fn reject(staff: StaffContext, Path(id): Path<String>, Form(form): Form<RejectForm>) -> AppResult {
    let Some(id): Option<VendorId> = parse_id(&id) else {
        return Ok(not_found(&staff).await);
    };
    match form.validate() {
        Ok(reason) => apply_review(staff, id, ReviewDecision::Reject { reason }).await,
        Err(_) => Ok(staff
            .page
            .error(
                "Please give a reason for rejecting this vendor.",
                &format!("/admin/vendors/{id}"),
            )
            .await),
    }
}

pub async fn price_list(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let vendor = find(&staff, &id).await?.ok_or(AppError::NotFound)?;
    let file = vendor.price_list().ok_or(AppError::NotFound)?;
    send_file(staff.page.files(), &file).await
}
