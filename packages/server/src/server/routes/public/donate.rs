use axum::{extract::Query, response::Response};
use serde::Deserialize;

use crate::server::extractors::PageContext;
use crate::server::views::{escape, forms};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DonateQuery {
    pub success: Option<String>,
    pub cancel: Option<String>,
}

fn paypal_form(business_id: &str, base_url: &str) -> String {
    format!(
        r#"<form action="https://www.paypal.com/donate" method="post" target="_top" class="paypal">
<input type="hidden" name="business" value="{business}">
<input type="hidden" name="currency_code" value="USD">
<input type="hidden" name="return" value="{base}/donate?success=1">
<input type="hidden" name="cancel_return" value="{base}/donate?cancel=1">
<button type="submit">Donate with PayPal</button>
</form>"#,
        business = escape(business_id),
        base = escape(base_url),
    )
}

pub async fn page(
    ctx: PageContext,
    headers: axum::http::HeaderMap,
    Query(query): Query<DonateQuery>,
) -> Response {
    if query.success.as_deref() == Some("1") {
        ctx.session
            .success("Thank you for your donation! Your support makes a difference. You should receive a confirmation email from PayPal shortly.")
            .await;
    } else if query.cancel.as_deref() == Some("1") {
        ctx.session
            .error("Your donation was cancelled. If you experienced any issues, please try again or contact us for assistance.")
            .await;
    }

    let online = match &ctx.state.config.paypal_business_id {
        Some(business_id) => {
            let scheme = if ctx.state.config.secure_cookies { "https" } else { "http" };
            let host = headers
                .get(axum::http::header::HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");
            paypal_form(business_id, &format!("{scheme}://{host}"))
        }
        None => "<p>Online giving is not available right now. Please use the form below to tell us about your gift.</p>".to_string(),
    };

    let pledge = forms::form("/donate", false, "", "I'd like to donate");

    let body = format!(
        r#"<h1>Donate</h1>
<section>
<p>Your gift funds programs, learning materials and direct support for
families, distributed through our approved local vendors.</p>
<h2>Give online</h2>
{online}
<h2>Other ways to give</h2>
<p>Checks, cash and bank transfers are welcome. Let us know you're giving
and a coordinator will follow up.</p>
{pledge}
</section>"#
    );
    ctx.render("Donate", body).await
}

pub async fn submit(ctx: PageContext) -> Response {
    ctx.success(
        "Thank you for your donation! Your support makes a difference.",
        "/donate",
    )
    .await
}
