use axum::{
    extract::{Path, Query},
    response::Response,
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::common::{DistributionId, FormErrors};
use crate::domains::funds::{
    DistributionForm, DistributionStatus, Donation, FundDistribution, FundsError,
};
use crate::domains::vendors::VendorSubmission;
use crate::server::error::AppResult;
use crate::server::extractors::{PageContext, StaffContext};
use crate::server::routes::admin::{admin_body, parse_id, status_filter, StatusQuery};
use crate::server::views::{datetime, empty, escape, forms, money, multiline, status_badge};

fn badge(status: DistributionStatus) -> String {
    status_badge(status.as_str(), status.label())
}

pub async fn list(staff: StaffContext, Query(query): Query<StatusQuery>) -> AppResult {
    let status = query.parse::<DistributionStatus>();
    let distributions = FundDistribution::find_all(status, staff.page.db()).await?;
    let rows = if distributions.is_empty() {
        empty("No distributions.")
    } else {
        let rows: String = distributions
            .iter()
            .map(|d| {
                format!(
                    r#"<tr><td><a href="/admin/distributions/{}">{}</a></td><td>{}</td><td class="num">{}</td><td>{}</td><td>{}</td></tr>"#,
                    d.distribution.id,
                    escape(&d.vendor_name),
                    escape(&d.donor_name),
                    money(d.distribution.amount),
                    badge(d.distribution.status()),
                    datetime(d.distribution.created_at)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Vendor</th><th>Donor</th><th>Amount</th><th>Status</th><th>Created</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let filters = status_filter(
        "/admin/distributions",
        status.map(|s| s.as_str()).unwrap_or(""),
        DistributionStatus::ALL.map(|s| (s.as_str(), s.label())),
    );
    let body = admin_body(format!(
        r#"<h1>Fund distributions</h1><p><a class="button" href="/admin/distributions/new">Allocate funds</a></p>{filters}{rows}"#
    ));
    Ok(staff.page.render("Fund distributions", body).await)
}

#[derive(Debug, Default, Deserialize)]
pub struct NewQuery {
    #[serde(default)]
    pub donation: String,
}

async fn form_body(page: &PageContext, form: &DistributionForm, errors: &FormErrors) -> anyhow::Result<String> {
    let donations = Donation::find_all_with_balance(page.db()).await?;
    let vendors = VendorSubmission::find_approved(page.db()).await?;

    let donation_options: Vec<(String, String)> = donations
        .iter()
        .map(|d| {
            (
                d.donation.id.to_string(),
                format!(
                    "{} ({} remaining)",
                    d.donation.donor_name,
                    money(d.balance().remaining)
                ),
            )
        })
        .collect();
    let vendor_options: Vec<(String, String)> = vendors
        .iter()
        .map(|v| (v.id.to_string(), v.business_name.clone()))
        .collect();

    let notice = if vendors.is_empty() {
        r#"<p class="notice">There are no approved vendors yet. Approve a vendor submission before allocating funds.</p>"#
    } else {
        ""
    };
    let fields = [
        forms::select(
            "Donation",
            "donation",
            std::iter::once(("", "Select a donation"))
                .chain(donation_options.iter().map(|(v, l)| (v.as_str(), l.as_str()))),
            form.donation.trim(),
            errors,
        ),
        forms::select(
            "Vendor",
            "vendor",
            std::iter::once(("", "Select a vendor"))
                .chain(vendor_options.iter().map(|(v, l)| (v.as_str(), l.as_str()))),
            form.vendor.trim(),
            errors,
        ),
        forms::input("Amount", "amount", "text", &form.amount, errors),
        forms::textarea("Purpose", "purpose", &form.purpose, errors),
    ]
    .concat();
    Ok(admin_body(format!(
        "<h1>Allocate funds</h1>{notice}{}",
        forms::form("/admin/distributions/new", false, &fields, "Create distribution")
    )))
}

pub async fn new_form(staff: StaffContext, Query(query): Query<NewQuery>) -> AppResult {
    let form = DistributionForm {
        donation: query.donation,
        ..Default::default()
    };
    let body = form_body(&staff.page, &form, &FormErrors::new()).await?;
    Ok(staff.page.render("Allocate funds", body).await)
}

pub async fn create(staff: StaffContext, Form(form): Form<DistributionForm>) -> AppResult {
    let errors = match form.validate() {
        Ok(input) => {
            match FundDistribution::allocate(input, &staff.user.username, staff.page.db()).await {
                Ok(distribution) => {
                    return Ok(staff
                        .page
                        .success(
                            "Distribution created and awaiting approval.",
                            &format!("/admin/distributions/{}", distribution.id),
                        )
                        .await)
                }
                Err(FundsError::Database(e)) => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, staff = %staff.user.username, "Allocation rejected");
                    let mut errors = FormErrors::new();
                    let field = match &e {
                        FundsError::DonationNotFound => "donation",
                        FundsError::VendorNotFound | FundsError::VendorNotApproved => "vendor",
                        _ => "amount",
                    };
                    errors.add(field, e.to_string());
                    staff.page.session.error(e.to_string()).await;
                    let body = form_body(&staff.page, &form, &errors).await?;
                    return Ok(staff.page.render("Allocate funds", body).await);
                }
            }
        }
        Err(errors) => errors,
    };

    staff.page.session.error("Please correct the errors below.").await;
    let body = form_body(&staff.page, &form, &errors).await?;
    Ok(staff.page.render("Allocate funds", body).await)
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let found = match parse_id(&id) {
        Some(id) => FundDistribution::find_by_id(id, staff.page.db()).await?,
        None => None,
    };
    let Some(found) = found else {
        return Ok(not_found(&staff).await);
    };
    let d = &found.distribution;
    let status = d.status();

    let stamp = |label: &str, by: &Option<String>, at: &Option<chrono::DateTime<chrono::Utc>>| match (by, at) {
        (Some(by), Some(at)) => format!("<dt>{label}</dt><dd>{} by {}</dd>", datetime(*at), escape(by)),
        _ => String::new(),
    };
    let base = format!("/admin/distributions/{}", d.id);
    let mut actions = Vec::new();
    if DistributionStatus::can_transition(status, DistributionStatus::Approved) {
        actions.push(forms::post_button(&format!("{base}/approve"), "Approve", "button"));
    }
    if DistributionStatus::can_transition(status, DistributionStatus::Distributed) {
        actions.push(forms::post_button(&format!("{base}/distribute"), "Mark as distributed", "button"));
    }
    if DistributionStatus::can_transition(status, DistributionStatus::Cancelled) {
        actions.push(forms::post_button(&format!("{base}/cancel"), "Cancel distribution", "button danger"));
    }

    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{amount} to {vendor} {badge}</h1>
<dl>
<dt>Donation</dt><dd><a href="/admin/donations/{donation_id}">{donor}</a></dd>
<dt>Vendor</dt><dd><a href="/admin/vendors/{vendor_id}">{vendor}</a></dd>
<dt>Created</dt><dd>{created} by {created_by}</dd>
{approved}{distributed}{cancelled}
</dl>
<h2>Purpose</h2>
<p>{purpose}</p>
<div class="actions">{actions}</div>
<p><a href="/admin/distributions">Back to distributions</a></p>
</article>"#,
        amount = money(d.amount),
        vendor = escape(&found.vendor_name),
        badge = badge(status),
        donation_id = d.donation_id,
        donor = escape(&found.donor_name),
        vendor_id = d.vendor_id,
        created = datetime(d.created_at),
        created_by = escape(&d.created_by),
        approved = stamp("Approved", &d.approved_by, &d.approved_at),
        distributed = stamp("Distributed", &d.distributed_by, &d.distributed_at),
        cancelled = stamp("Cancelled", &d.cancelled_by, &d.cancelled_at),
        purpose = multiline(&d.purpose),
        actions = actions.concat(),
    ));
    Ok(staff.page.render("Distribution", body).await)
}

async fn not_found(staff: &StaffContext) -> Response {
    staff
        .page
        .error("Distribution not found.", "/admin/distributions")
        .await
}

async fn apply(
    staff: StaffContext,
    raw_id: String,
    to: DistributionStatus,
    success: &str,
) -> AppResult {
    let Some(id): Option<DistributionId> = parse_id(&raw_id) else {
        return Ok(not_found(&staff).await);
    };
    let target = format!("/admin/distributions/{id}");
    let actor = staff.user.username.as_str();
    let db = staff.page.db();

    let result = match to {
        DistributionStatus::Approved => FundDistribution::approve(id, actor, db).await,
        DistributionStatus::Distributed => FundDistribution::mark_distributed(id, actor, db).await,
        DistributionStatus::Cancelled => FundDistribution::cancel(id, actor, db).await,
        DistributionStatus::Pending => Err(FundsError::InvalidTransition {
            from: DistributionStatus::Pending,
            to,
        }),
    };

    match result {
        Ok(distribution) => {
            info!(distribution_id = %id, status = %distribution.status(), staff = %actor, "Distribution updated");
            Ok(staff.page.success(success, &target).await)
        }
        Err(FundsError::DistributionNotFound) => Ok(not_found(&staff).await),
        Err(FundsError::Database(e)) => Err(e.into()),
        Err(e) => Ok(staff.page.error(e.to_string(), &target).await),
    }
}

pub async fn approve(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    apply(staff, id, DistributionStatus::Approved, "Distribution approved.").await
}

pub async fn distribute(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    apply(staff, id, DistributionStatus::Distributed, "Distribution marked as distributed.").await
}

pub async fn cancel(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    apply(staff, id, DistributionStatus::Cancelled, "Distribution cancelled. The amount has been returned to the donation balance.").await
}
