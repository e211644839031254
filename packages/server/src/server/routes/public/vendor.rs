use axum::{extract::Multipart, response::Response};

use crate::common::{FormData, FormErrors};
use crate::domains::vendors::{submit_vendor, VendorError, VendorForm};
use crate::server::error::{AppError, AppResult};
use crate::server::extractors::PageContext;
use crate::server::routes::files::read_multipart;
use crate::server::views::forms;

fn vendor_body(fields: &FormData, errors: &FormErrors) -> String {
    let form_fields = [
        forms::input("Business name", "business_name", "text", fields.text("business_name"), errors),
        forms::input("Contact name", "contact_name", "text", fields.text("contact_name"), errors),
        forms::input("Email", "email", "email", fields.text("email"), errors),
        forms::input("Phone", "phone", "tel", fields.text("phone"), errors),
        forms::input("Website (optional)", "website", "url", fields.text("website"), errors),
        forms::textarea(
            "Services you provide",
            "services_description",
            fields.text("services_description"),
            errors,
        ),
        forms::file("Price list (optional)", "price_list", errors),
    ]
    .concat();

    format!(
        r#"<h1>Become a vendor</h1>
<section>
<p>We partner with local businesses to provide goods and services to the
families we serve. Donated funds are distributed only to approved vendors.</p>
<p>Tell us about your business. Our team reviews every submission.</p>
{form}
</section>"#,
        form = forms::form("/vendor", true, &form_fields, "Submit")
    )
}

pub async fn page(ctx: PageContext) -> Response {
    ctx.render("Vendors", vendor_body(&FormData::new(), &FormErrors::new()))
        .await
}

pub async fn submit(ctx: PageContext, multipart: Multipart) -> AppResult {
    let form = read_multipart(multipart).await?;

    let errors = match (VendorForm { fields: &form.fields }).validate() {
        Ok(input) => {
            match submit_vendor(input, form.file("price_list"), ctx.files(), ctx.db()).await {
                Ok(_) => {
                    return Ok(ctx
                        .success(
                            "Thank you! Your vendor submission has been received and is pending review.",
                            "/vendor",
                        )
                        .await)
                }
                Err(VendorError::File(e)) if e.is_rejection() => {
                    let mut errors = FormErrors::new();
                    errors.add("price_list", e.to_string());
                    errors
                }
                Err(VendorError::Internal(e)) => return Err(AppError::Internal(e)),
                Err(other) => return Err(AppError::Internal(other.into())),
            }
        }
        Err(errors) => errors,
    };

    ctx.session.error("Please correct the errors below.").await;
    Ok(ctx.render("Vendors", vendor_body(&form.fields, &errors)).await)
}
