use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::common::AdminUserId;
use crate::domains::accounts::AdminUser;

/// Session token (random UUID)
pub type SessionToken = String;

/// The logged-in account, as recorded at login
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub id: AdminUserId,
    pub username: String,
    pub is_staff: bool,
}

impl From<&AdminUser> for SessionUser {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
            FlashLevel::Info => "info",
        }
    }
}

/// One-shot message shown on the next rendered page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub flashes: Vec<Flash>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        Self {
            user: None,
            flashes: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// In-memory session store
///
/// Sessions expire `ttl` after creation; expired tokens behave as unknown.
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn is_live(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(session.created_at) < self.ttl
    }

    /// Create an anonymous session and return its token
    pub async fn create_session(&self) -> SessionToken {
        self.insert(Session::new()).await
    }

    async fn insert(&self, session: Session) -> SessionToken {
        let token = Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);
        token
    }

    /// Get session by token
    pub async fn get_session(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;
        if !self.is_live(session, Utc::now()) {
            return None;
        }
        Some(session.clone())
    }

    /// Apply `f` to a live session. Returns false for unknown or expired tokens.
    async fn update(&self, token: &str, f: impl FnOnce(&mut Session)) -> bool {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(session) if self.is_live(session, now) => {
                f(session);
                true
            }
            _ => false,
        }
    }

    pub async fn push_flash(&self, token: &str, level: FlashLevel, message: impl Into<String>) {
        let message = message.into();
        self.update(token, |s| s.flashes.push(Flash { level, message }))
            .await;
    }

    /// Remove and return pending flashes
    pub async fn take_flashes(&self, token: &str) -> Vec<Flash> {
        let mut flashes = Vec::new();
        self.update(token, |s| flashes = std::mem::take(&mut s.flashes))
            .await;
        flashes
    }

    /// Log `user` in under a fresh token; the old token stops working.
    ///
    /// Pending flashes carry over to the new session.
    pub async fn login(&self, old_token: &str, user: SessionUser) -> SessionToken {
        let flashes = {
            let mut sessions = self.sessions.write().await;
            sessions
                .remove(old_token)
                .map(|s| s.flashes)
                .unwrap_or_default()
        };
        self.insert(Session {
            user: Some(user),
            flashes,
            created_at: Utc::now(),
        })
        .await
    }

    /// Forget the logged-in user, keeping the session for flashes
    pub async fn logout(&self, token: &str) {
        self.update(token, |s| s.user = None).await;
    }

    /// Clean up expired sessions (run periodically). Returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| now.signed_duration_since(session.created_at) < self.ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[cfg(test)]
    async fn backdate(&self, token: &str, by: Duration) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(token) {
            session.created_at -= by;
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}
