use axum::{
    extract::{Extension, Request},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::server::app::AppState;
use crate::server::auth::{Flash, FlashLevel, SessionStore, SessionToken, SessionUser};
use crate::server::error::ErrorPage;
use crate::server::views::PageChrome;

pub const SESSION_COOKIE: &str = "hub_session";

fn is_sessionless(path: &str) -> bool {
    path == "/health" || path.starts_with("/static/")
}

/// Request-scoped view of the visitor's session.
///
/// Cloned into request extensions by [`session_middleware`]. Visitors without
/// a live session get one only when something needs storing (a flash or a
/// login). The token can change during the request, and the middleware
/// issues the cookie when it does.
#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<SessionStore>,
    token: Arc<RwLock<Option<SessionToken>>>,
}

impl SessionHandle {
    pub fn new(store: Arc<SessionStore>, token: Option<SessionToken>) -> Self {
        Self {
            store,
            token: Arc::new(RwLock::new(token)),
        }
    }

    pub async fn token(&self) -> Option<SessionToken> {
        self.token.read().await.clone()
    }

    async fn ensure_token(&self) -> SessionToken {
        let mut token = self.token.write().await;
        if let Some(existing) = token.as_ref() {
            return existing.clone();
        }
        let fresh = self.store.create_session().await;
        *token = Some(fresh.clone());
        fresh
    }

    pub async fn user(&self) -> Option<SessionUser> {
        let token = self.token().await?;
        self.store.get_session(&token).await.and_then(|s| s.user)
    }

    pub async fn flash(&self, level: FlashLevel, message: impl Into<String>) {
        let token = self.ensure_token().await;
        self.store.push_flash(&token, level, message).await;
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.flash(FlashLevel::Success, message).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.flash(FlashLevel::Error, message).await;
    }

    pub async fn take_flashes(&self) -> Vec<Flash> {
        match self.token().await {
            Some(token) => self.store.take_flashes(&token).await,
            None => Vec::new(),
        }
    }

    /// Log in under a new token
    pub async fn login(&self, user: SessionUser) {
        let mut token = self.token.write().await;
        let fresh = self
            .store
            .login(token.as_deref().unwrap_or_default(), user)
            .await;
        *token = Some(fresh);
    }

    pub async fn logout(&self) {
        if let Some(token) = self.token().await {
            self.store.logout(&token).await;
        }
    }
}

/// Middleware that attaches a [`SessionHandle`] to every page request
///
/// Unknown or expired cookies count as no session. The cookie is written
/// whenever a session exists and its token differs from the one the browser
/// sent. Error pages are re-rendered with the configured site chrome.
pub async fn session_middleware(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_sessionless(request.uri().path()) {
        return next.run(request).await;
    }

    let presented = session_cookie(request.headers());
    let live = match presented {
        Some(ref token) if state.sessions.get_session(token).await.is_some() => {
            Some(token.clone())
        }
        _ => None,
    };

    let handle = SessionHandle::new(state.sessions.clone(), live);
    request.extensions_mut().insert(handle.clone());

    let mut response = next.run(request).await;

    if let Some(page) = response.extensions().get::<ErrorPage>().cloned() {
        let user = handle.user().await;
        response = page.render(&PageChrome {
            site_name: &state.config.site_name,
            user: user.as_ref(),
            flashes: &[],
        });
    }

    if let Some(current) = handle.token().await {
        if presented.as_deref() != Some(current.as_str()) {
            let cookie = cookie_header(
                &current,
                state.config.secure_cookies,
                state.config.session_ttl_hours * 3600,
            );
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => warn!(error = %e, "Could not encode session cookie"),
            }
        }
    }

    response
}

/// Session token from the request's `Cookie` headers
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn cookie_header(token: &str, secure: bool, max_age_secs: i64) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("a=1; hub_session=abc123 ; b=2"),
        );
        assert_eq!(session_cookie(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn missing_or_empty_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("hub_session="));
        assert_eq!(session_cookie(&headers), None);
    }

    #[tokio::test]
    async fn session_is_created_on_first_flash() {
        let store = Arc::new(SessionStore::default());
        let handle = SessionHandle::new(store.clone(), None);

        assert!(handle.user().await.is_none());
        assert!(handle.take_flashes().await.is_empty());
        handle.logout().await;
        assert_eq!(store.len().await, 0);
        assert!(handle.token().await.is_none());

        handle.success("Saved.").await;
        assert_eq!(store.len().await, 1);
        let flashes = handle.take_flashes().await;
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].message, "Saved.");
    }

    #[tokio::test]
    async fn login_without_session_creates_one() {
        let store = Arc::new(SessionStore::default());
        let handle = SessionHandle::new(store.clone(), None);
        handle
            .login(SessionUser {
                id: crate::common::AdminUserId::new(),
                username: "coordinator".to_string(),
                is_staff: true,
            })
            .await;

        assert_eq!(store.len().await, 1);
        assert_eq!(handle.user().await.unwrap().username, "coordinator");
    }

    #[test]
    fn cookie_attributes() {
        let plain = cookie_header("t", false, 86400);
        assert_eq!(plain, "hub_session=t; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400");
        assert!(cookie_header("t", true, 60).ends_with("; Secure"));
    }
}
