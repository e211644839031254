use axum::{
    extract::Query,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::common::{safe_redirect_target, FormErrors};
use crate::domains::accounts::{authenticate, LoginForm};
use crate::server::auth::SessionUser;
use crate::server::error::AppResult;
use crate::server::extractors::PageContext;
use crate::server::views::forms;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn login_body(username: &str, next: Option<&str>) -> String {
    let action = match next {
        Some(next) => format!("/admin/login?next={}", urlencoding::encode(next)),
        None => "/admin/login".to_string(),
    };
    let no_errors = FormErrors::new();
    let fields = [
        forms::input("Username", "username", "text", username, &no_errors),
        forms::input("Password", "password", "password", "", &no_errors),
    ]
    .concat();
    format!(
        r#"<section class="login">
<h1>Staff login</h1>
{}
<p>Need an account? <a href="/register">Register</a>. An administrator must grant staff access.</p>
</section>"#,
        forms::form(&action, false, &fields, "Log in")
    )
}

pub async fn login_form(ctx: PageContext, Query(query): Query<NextQuery>) -> Response {
    if ctx.user.as_ref().is_some_and(|u| u.is_staff) {
        return Redirect::to("/admin").into_response();
    }
    ctx.render("Staff login", login_body("", query.next.as_deref()))
        .await
}

pub async fn login(
    ctx: PageContext,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> AppResult {
    let next = query.next.as_deref();

    let Some((username, password)) = form.credentials() else {
        ctx.session.error("Please enter both username and password.").await;
        return Ok(ctx
            .render("Staff login", login_body(form.username.trim(), next))
            .await);
    };

    match authenticate(username, password, ctx.db()).await? {
        Some(user) if user.is_staff => {
            ctx.session.login(SessionUser::from(&user)).await;
            tracing::info!(user_id = %user.id, "Staff login");
            let target = safe_redirect_target(next, "/admin");
            Ok(ctx
                .success(format!("Welcome back, {}!", user.username), target)
                .await)
        }
        Some(_) => {
            ctx.session.error("Access denied. Staff privileges required.").await;
            Ok(ctx.render("Staff login", login_body(username, next)).await)
        }
        None => {
            ctx.session.error("Invalid username or password.").await;
            Ok(ctx.render("Staff login", login_body(username, next)).await)
        }
    }
}

pub async fn logout(ctx: PageContext) -> Response {
    ctx.session.logout().await;
    ctx.success("You have been logged out.", "/admin/login").await
}
