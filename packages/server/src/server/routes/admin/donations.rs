use axum::{extract::Path, response::Response, Form};
use chrono::Utc;
use tracing::info;

use crate::common::FormErrors;
use crate::domains::funds::{DonationForm, DonationMethod, Donation, FundDistribution};
use crate::server::error::AppResult;
use crate::server::extractors::StaffContext;
use crate::server::routes::admin::{admin_body, parse_id};
use crate::server::views::{date, datetime, empty, escape, forms, money, multiline, status_badge};

pub async fn list(staff: StaffContext) -> AppResult {
    let donations = Donation::find_all_with_balance(staff.page.db()).await?;
    let rows = if donations.is_empty() {
        empty("No donations recorded yet.")
    } else {
        let rows: String = donations
            .iter()
            .map(|d| {
                let balance = d.balance();
                format!(
                    r#"<tr><td><a href="/admin/donations/{}">{}</a></td><td>{}</td><td>{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
                    d.donation.id,
                    escape(&d.donation.donor_name),
                    date(d.donation.received_on),
                    escape(DonationMethod::label_for(&d.donation.method)),
                    money(balance.amount),
                    money(balance.committed),
                    money(balance.remaining)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Donor</th><th>Received</th><th>Method</th><th>Amount</th><th>Committed</th><th>Remaining</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let totals = Donation::totals(staff.page.db()).await?;
    let body = admin_body(format!(
        r#"<h1>Donations</h1>
<p class="meta">Donated {} &middot; committed {} &middot; distributed {}</p>
<p><a class="button" href="/admin/donations/new">Record donation</a></p>
{rows}"#,
        money(totals.donated),
        money(totals.committed),
        money(totals.distributed),
    ));
    Ok(staff.page.render("Donations", body).await)
}

fn form_body(form: &DonationForm, errors: &FormErrors) -> String {
    let methods = DonationMethod::ALL.map(|m| (m.as_str(), m.label()));
    let selected = if form.method.is_empty() {
        DonationMethod::default().as_str()
    } else {
        form.method.as_str()
    };
    let fields = [
        forms::input("Donor name", "donor_name", "text", &form.donor_name, errors),
        forms::input("Donor email (optional)", "donor_email", "email", &form.donor_email, errors),
        forms::input("Amount", "amount", "text", &form.amount, errors),
        forms::select("Method", "method", methods, selected, errors),
        forms::input("Reference (check number, transaction id)", "reference", "text", &form.reference, errors),
        forms::input("Received on (blank for today)", "received_on", "date", &form.received_on, errors),
        forms::textarea("Note", "note", &form.note, errors),
    ]
    .concat();
    admin_body(format!(
        "<h1>Record donation</h1>{}",
        forms::form("/admin/donations/new", false, &fields, "Save donation")
    ))
}

pub async fn new_form(staff: StaffContext) -> Response {
    staff
        .page
        .render("Record donation", form_body(&DonationForm::default(), &FormErrors::new()))
        .await
}

pub async fn create(staff: StaffContext, Form(form): Form<DonationForm>) -> AppResult {
    match form.validate(Utc::now().date_naive()) {
        Ok(input) => {
            let donation = Donation::create(input, &staff.user.username, staff.page.db()).await?;
            info!(donation_id = %donation.id, amount = %donation.amount, "Donation recorded");
            Ok(staff
                .page
                .success(
                    "Donation recorded successfully!",
                    &format!("/admin/donations/{}", donation.id),
                )
                .await)
        }
        Err(errors) => {
            staff.page.session.error("Please correct the errors below.").await;
            Ok(staff.page.render("Record donation", form_body(&form, &errors)).await)
        }
    }
}

pub async fn detail(staff: StaffContext, Path(id): Path<String>) -> AppResult {
    let found = match parse_id(&id) {
        Some(id) => Donation::find_with_balance(id, staff.page.db()).await?,
        None => None,
    };
    let Some(found) = found else {
        return Ok(staff.page.error("Donation not found.", "/admin/donations").await);
    };
    let donation = &found.donation;
    let balance = found.balance();
    let distributions = FundDistribution::find_by_donation(donation.id, staff.page.db()).await?;

    let rows = if distributions.is_empty() {
        empty("Nothing has been allocated from this donation.")
    } else {
        let rows: String = distributions
            .iter()
            .map(|d| {
                let status = d.distribution.status();
                format!(
                    r#"<tr><td><a href="/admin/distributions/{}">{}</a></td><td class="num">{}</td><td>{}</td><td>{}</td></tr>"#,
                    d.distribution.id,
                    escape(&d.vendor_name),
                    money(d.distribution.amount),
                    status_badge(status.as_str(), status.label()),
                    datetime(d.distribution.created_at)
                )
            })
            .collect();
        format!("<table><thead><tr><th>Vendor</th><th>Amount</th><th>Status</th><th>Created</th></tr></thead><tbody>{rows}</tbody></table>")
    };
    let optional = |value: &str| {
        if value.is_empty() {
            "-".to_string()
        } else {
            escape(value)
        }
    };

    let body = admin_body(format!(
        r#"<article class="detail">
<h1>{donor}</h1>
<dl>
<dt>Email</dt><dd>{email}</dd>
<dt>Received</dt><dd>{received}</dd>
<dt>Method</dt><dd>{method}</dd>
<dt>Reference</dt><dd>{reference}</dd>
<dt>Recorded by</dt><dd>{recorded_by}</dd>
</dl>
<p>{note}</p>
<h2>Balance</h2>
<table class="balance">
<tr><th>Amount</th><td class="num">{amount}</td></tr>
<tr><th>Committed</th><td class="num">{committed}</td></tr>
<tr><th>Distributed</th><td class="num">{distributed}</td></tr>
<tr><th>Remaining</th><td class="num">{remaining}</td></tr>
</table>
<h2>Distributions</h2>
<p><a class="button" href="/admin/distributions/new?donation={id}">Allocate funds</a></p>
{rows}
<p><a href="/admin/donations">Back to donations</a></p>
</article>"#,
        donor = escape(&donation.donor_name),
        email = optional(&donation.donor_email),
        received = date(donation.received_on),
        method = escape(DonationMethod::label_for(&donation.method)),
        reference = optional(&donation.reference),
        recorded_by = escape(&donation.recorded_by),
        note = multiline(&donation.note),
        amount = money(balance.amount),
        committed = money(balance.committed),
        distributed = money(balance.distributed),
        remaining = money(balance.remaining),
        id = donation.id,
    ));
    Ok(staff.page.render(&donation.donor_name, body).await)
}
