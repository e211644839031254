use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::config::DEFAULT_SITE_NAME;
use crate::server::views::{escape, render_page, PageChrome};

/// Failures a handler cannot turn into a flash and redirect
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

/// Error page content, kept in the response extensions so the session
/// middleware can re-render it with the configured site chrome.
#[derive(Clone, Debug)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: String,
}

impl ErrorPage {
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            title: "Page not found",
            message: "The page you requested does not exist.".to_string(),
        }
    }

    pub fn body(&self) -> String {
        format!(
            r#"<section class="error-page"><h1>{}</h1><p>{}</p><p><a href="/">Return home</a></p></section>"#,
            escape(self.title),
            escape(&self.message)
        )
    }

    pub fn render(&self, chrome: &PageChrome) -> Response {
        let page = render_page(chrome, self.title, &self.body());
        let mut response = (self.status, Html(page)).into_response();
        response.extensions_mut().insert(self.clone());
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let page = match &self {
            AppError::NotFound => ErrorPage::not_found(),
            AppError::BadRequest(reason) => ErrorPage {
                status: StatusCode::BAD_REQUEST,
                title: "Bad request",
                message: reason.clone(),
            },
            AppError::Internal(e) => {
                error!(error = ?e, "Request failed");
                ErrorPage {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    title: "Server error",
                    message: "Something went wrong on our end. Please try again later.".to_string(),
                }
            }
        };

        page.render(&PageChrome {
            site_name: DEFAULT_SITE_NAME,
            user: None,
            flashes: &[],
        })
    }
}

pub type AppResult = Result<Response, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_carries_its_page() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let page = response.extensions().get::<ErrorPage>().unwrap();
        assert_eq!(page.title, "Page not found");
    }

    #[test]
    fn internal_error_hides_details() {
        let response = AppError::Internal(anyhow::anyhow!("pool timed out")).into_response();
        let page = response.extensions().get::<ErrorPage>().unwrap();
        assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!page.message.contains("pool"));
    }
}
