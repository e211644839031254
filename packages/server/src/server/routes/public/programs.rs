use axum::{extract::Path, response::Response, Form};
use tracing::info;

use crate::common::{FormErrors, ProgramId};
use crate::domains::programs::{Program, ProgramForm};
use crate::server::error::AppResult;
use crate::server::extractors::PageContext;
use crate::server::views::{self, empty, escape, forms, multiline};

/// Summary card used on the home page and the program list
pub fn card(program: &Program) -> String {
    format!(
        r#"<article class="card">
<h3><a href="/programs/{id}">{title}</a></h3>
<p class="meta">{date} at {time} &middot; {location}</p>
</article>"#,
        id = program.id,
        title = escape(&program.title),
        date = views::date(program.date),
        time = views::time(program.time),
        location = escape(&program.location),
    )
}

pub async fn list(ctx: PageContext) -> AppResult {
    let programs = Program::find_all(ctx.db()).await?;
    let items = if programs.is_empty() {
        empty("No programs yet.")
    } else {
        let cards: String = programs.iter().map(card).collect();
        format!(r#"<div class="cards">{cards}</div>"#)
    };
    let body = format!(
        r#"<h1>Programs</h1>
<p><a class="button" href="/programs/new">Add a program</a></p>
{items}"#
    );
    Ok(ctx.render("Programs", body).await)
}

fn form_page(form: &ProgramForm, errors: &FormErrors) -> String {
    let fields = [
        forms::input("Title", "title", "text", &form.title, errors),
        forms::textarea("Description", "description", &form.description, errors),
        forms::input("Date", "date", "date", &form.date, errors),
        forms::input("Time", "time", "time", &form.time, errors),
        forms::input("Location", "location", "text", &form.location, errors),
    ]
    .concat();
    format!(
        "<h1>New program</h1>{}",
        forms::form("/programs/new", false, &fields, "Create program")
    )
}

pub async fn new_form(ctx: PageContext) -> Response {
    ctx.render("New program", form_page(&ProgramForm::default(), &FormErrors::new()))
        .await
}

pub async fn create(ctx: PageContext, Form(form): Form<ProgramForm>) -> AppResult {
    match form.validate() {
        Ok(input) => {
            let program = Program::create(input, ctx.db()).await?;
            info!(program_id = %program.id, "Program created");
            Ok(ctx.success("Program created successfully!", "/programs").await)
        }
        Err(errors) => {
            ctx.session.error("Please correct the errors below.").await;
            Ok(ctx.render("New program", form_page(&form, &errors)).await)
        }
    }
}

pub async fn detail(ctx: PageContext, Path(id): Path<String>) -> AppResult {
    let program = match ProgramId::parse(&id) {
        Ok(id) => Program::find_by_id(id, ctx.db()).await?,
        Err(_) => None,
    };
    let Some(program) = program else {
        return Ok(ctx.error("Program not found.", "/programs").await);
    };

    let body = format!(
        r#"<article class="detail">
<h1>{title}</h1>
<p class="meta">{date} at {time}</p>
<p class="meta">Location: {location}</p>
<div class="description">{description}</div>
<p><a href="/programs">Back to programs</a></p>
</article>"#,
        title = escape(&program.title),
        date = views::date(program.date),
        time = views::time(program.time),
        location = escape(&program.location),
        description = multiline(&program.description),
    );
    Ok(ctx.render(&program.title, body).await)
}
