//! Public pages

pub mod donate;
pub mod membership;
pub mod participants;
pub mod programs;
pub mod register;
pub mod vendor;

use axum::response::Response;

use crate::domains::participants::Participant;
use crate::domains::programs::Program;
use crate::server::error::{AppResult, ErrorPage};
use crate::server::extractors::PageContext;
use crate::server::views::{empty, escape};

pub async fn home(ctx: PageContext) -> AppResult {
    let programs = Program::find_latest(5, ctx.db()).await?;
    let participant_count = Participant::count(ctx.db()).await?;

    let upcoming = if programs.is_empty() {
        empty("No programs scheduled yet.")
    } else {
        let cards: String = programs.iter().map(programs::card).collect();
        format!(r#"<div class="cards">{cards}</div>"#)
    };

    let body = format!(
        r#"<section class="hero">
<h1>Welcome to {site}</h1>
<p>Programs, resources and support for families in our community.</p>
<p><a class="button" href="/participants/new">Register your family</a>
<a class="button secondary" href="/donate">Support our work</a></p>
</section>
<section>
<h2>Latest programs</h2>
{upcoming}
<p><a href="/programs">See all programs</a></p>
</section>
<section class="stats">
<p><strong>{participant_count}</strong> families registered</p>
</section>"#,
        site = escape(&ctx.state.config.site_name),
    );

    Ok(ctx.render("Home", body).await)
}

pub async fn about(ctx: PageContext) -> Response {
    let body = format!(
        r#"<section>
<h1>About {site}</h1>
<p>We are a volunteer-run organization connecting families with programs,
learning resources and local service providers.</p>
<h2>What we do</h2>
<ul>
<li>Host community programs and events</li>
<li>Publish courses, quizzes and guides for parents</li>
<li>Help families pre-qualify for membership benefits</li>
<li>Direct donated funds to approved local vendors</li>
</ul>
</section>"#,
        site = escape(&ctx.state.config.site_name)
    );
    ctx.render("About", body).await
}

pub async fn not_found(ctx: PageContext) -> Response {
    let page = ErrorPage::not_found();
    ctx.render_status(page.status, page.title, page.body()).await
}
