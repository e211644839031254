//! Request extractors for page handlers

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use sqlx::PgPool;

use crate::kernel::FileStore;
use crate::server::app::AppState;
use crate::server::auth::{FlashLevel, SessionUser};
use crate::server::middleware::SessionHandle;
use crate::server::views::{render_page, PageChrome};

/// Everything a page handler needs: shared state, the session and who is logged in
#[derive(Clone)]
pub struct PageContext {
    pub state: AppState,
    pub session: SessionHandle,
    pub user: Option<SessionUser>,
}

impl PageContext {
    pub fn db(&self) -> &PgPool {
        &self.state.db_pool
    }

    pub fn files(&self) -> &FileStore {
        &self.state.files
    }

    /// Full HTML page; pending flashes are consumed here.
    pub async fn render(&self, title: &str, body: String) -> Response {
        self.render_status(StatusCode::OK, title, body).await
    }

    pub async fn render_status(&self, status: StatusCode, title: &str, body: String) -> Response {
        let flashes = self.session.take_flashes().await;
        let page = render_page(
            &PageChrome {
                site_name: &self.state.config.site_name,
                user: self.user.as_ref(),
                flashes: &flashes,
            },
            title,
            &body,
        );
        (status, Html(page)).into_response()
    }

    /// Flash a message and redirect (303, so a POST becomes a GET)
    pub async fn redirect_with(&self, level: FlashLevel, message: impl Into<String>, to: &str) -> Response {
        self.session.flash(level, message).await;
        Redirect::to(to).into_response()
    }

    pub async fn success(&self, message: impl Into<String>, to: &str) -> Response {
        self.redirect_with(FlashLevel::Success, message, to).await
    }

    pub async fn error(&self, message: impl Into<String>, to: &str) -> Response {
        self.redirect_with(FlashLevel::Error, message, to).await
    }
}

fn missing_session() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Session middleware not installed").into_response()
}

#[async_trait]
impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<AppState>()
            .cloned()
            .ok_or_else(missing_session)?;
        let session = parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or_else(missing_session)?;
        let user = session.user().await;

        Ok(Self {
            state,
            session,
            user,
        })
    }
}

/// A page handler that requires a staff session
///
/// Anyone else is sent to the login page with `next` pointing back here.
pub struct StaffContext {
    pub page: PageContext,
    pub user: SessionUser,
}

#[async_trait]
impl<S> FromRequestParts<S> for StaffContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let page = PageContext::from_request_parts(parts, state).await?;

        match page.user.clone() {
            Some(user) if user.is_staff => Ok(Self { page, user }),
            _ => {
                // Nested routers see the path with the `/admin` prefix stripped
                let uri = parts
                    .extensions
                    .get::<OriginalUri>()
                    .map(|original| &original.0)
                    .unwrap_or(&parts.uri);
                let next = uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/admin");
                let target = format!("/admin/login?next={}", urlencoding::encode(next));
                Err(page
                    .error("Please log in to access the admin area.", &target)
                    .await)
            }
        }
    }
}
