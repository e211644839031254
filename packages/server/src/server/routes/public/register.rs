use axum::{response::Response, Form};

use crate::common::FormErrors;
use crate::domains::accounts::{register, AccountError, RegistrationForm};
use crate::server::auth::{FlashLevel, SessionUser};
use crate::server::error::{AppError, AppResult};
use crate::server::extractors::PageContext;
use crate::server::views::forms;

fn register_body(form: &RegistrationForm, errors: &FormErrors) -> String {
    // Passwords are never echoed back.
    let fields = [
        forms::input("Username", "username", "text", &form.username, errors),
        forms::input("Email", "email", "email", &form.email, errors),
        forms::input("Password", "password1", "password", "", errors),
        forms::input("Confirm password", "password2", "password", "", errors),
    ]
    .concat();
    format!(
        r#"<h1>Create an account</h1>
<p>Letters, digits and @/./+/-/_ only. Passwords need at least 8 characters.</p>
{}"#,
        forms::form("/register", false, &fields, "Create account")
    )
}

pub async fn form(ctx: PageContext) -> Response {
    if ctx.user.is_some() {
        return ctx
            .redirect_with(
                FlashLevel::Info,
                "You are already logged in.",
                "/",
            )
            .await;
    }
    ctx.render(
        "Register",
        register_body(&RegistrationForm::default(), &FormErrors::new()),
    )
    .await
}

pub async fn submit(ctx: PageContext, Form(form): Form<RegistrationForm>) -> AppResult {
    if ctx.user.is_some() {
        return Ok(ctx
            .redirect_with(
                FlashLevel::Info,
                "You are already logged in.",
                "/",
            )
            .await);
    }

    let errors = match form.validate() {
        Ok(input) => match register(input, ctx.db()).await {
            Ok(user) => {
                ctx.session.login(SessionUser::from(&user)).await;
                return Ok(ctx
                    .success(
                        format!("Account created successfully! Welcome, {}!", user.username),
                        "/",
                    )
                    .await);
            }
            Err(AccountError::UsernameTaken) => {
                let mut errors = FormErrors::new();
                errors.add("username", AccountError::UsernameTaken.to_string());
                errors
            }
            Err(AccountError::Internal(e)) => return Err(AppError::Internal(e)),
        },
        Err(errors) => errors,
    };

    ctx.session.error("Please correct the errors below.").await;
    Ok(ctx.render("Register", register_body(&form, &errors)).await)
}
