use axum::{response::Response, Form};
use tracing::info;

use crate::common::FormErrors;
use crate::domains::participants::{Participant, ParticipantForm};
use crate::server::error::AppResult;
use crate::server::extractors::PageContext;
use crate::server::views::{self, empty, escape, forms};

pub async fn list(ctx: PageContext) -> AppResult {
    let participants = Participant::find_all(ctx.db()).await?;
    let table = if participants.is_empty() {
        empty("No participants registered yet.")
    } else {
        let rows: String = participants
            .iter()
            .map(|p| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&p.name),
                    escape(&p.email),
                    escape(&p.phone),
                    escape(&p.children_ages),
                    views::datetime(p.registered_at)
                )
            })
            .collect();
        format!(
            "<table><thead><tr><th>Name</th><th>Email</th><th>Phone</th><th>Children's ages</th><th>Registered</th></tr></thead><tbody>{rows}</tbody></table>"
        )
    };
    let body = format!(
        r#"<h1>Participants</h1>
<p><a class="button" href="/participants/new">Register a participant</a></p>
{table}"#
    );
    Ok(ctx.render("Participants", body).await)
}

fn form_page(form: &ParticipantForm, errors: &FormErrors) -> String {
    let fields = [
        forms::input("Name", "name", "text", &form.name, errors),
        forms::input("Email", "email", "email", &form.email, errors),
        forms::input("Phone", "phone", "tel", &form.phone, errors),
        forms::input("Children's ages", "children_ages", "text", &form.children_ages, errors),
    ]
    .concat();
    format!(
        "<h1>Register a participant</h1>{}",
        forms::form("/participants/new", false, &fields, "Register")
    )
}

pub async fn new_form(ctx: PageContext) -> Response {
    ctx.render(
        "Register a participant",
        form_page(&ParticipantForm::default(), &FormErrors::new()),
    )
    .await
}

pub async fn create(ctx: PageContext, Form(form): Form<ParticipantForm>) -> AppResult {
    match form.validate() {
        Ok(input) => {
            let participant = Participant::create(input, ctx.db()).await?;
            info!(participant_id = %participant.id, "Participant registered");
            Ok(ctx
                .success("Participant registered successfully!", "/participants")
                .await)
        }
        Err(errors) => {
            ctx.session.error("Please correct the errors below.").await;
            Ok(ctx
                .render("Register a participant", form_page(&form, &errors))
                .await)
        }
    }
}
