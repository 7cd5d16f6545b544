//! Session management backed by the `sessions` table

use anyhow::{Result, anyhow};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use rand::distributions::{Alphanumeric, DistString};
use tracing::info;
use uuid::Uuid;

use crate::{models::Session, repositories::SessionRepository};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "sessionid";

const TOKEN_LENGTH: usize = 48;

/// Session manager for handling user sessions
#[derive(Clone)]
pub struct SessionManager {
    repository: SessionRepository,
    ttl_seconds: i64,
    secure_cookies: bool,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(repository: SessionRepository, ttl_seconds: i64, secure_cookies: bool) -> Self {
        Self {
            repository,
            ttl_seconds,
            secure_cookies,
        }
    }

    /// Create a new session for a user
    pub async fn create_session(&self, user_id: Uuid) -> Result<Session> {
        info!("Creating session for user: {}", user_id);

        let expires_at = Duration::try_seconds(self.ttl_seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| anyhow!("Session lifetime of {}s is out of range", self.ttl_seconds))?;
        let token = Alphanumeric.sample_string(&mut rand::thread_rng(), TOKEN_LENGTH);

        self.repository.create(&token, user_id, expires_at).await
    }

    /// Look up a live session; an expired one is deleted on sight
    pub async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        let Some(session) = self.repository.find_by_token(token).await? else {
            return Ok(None);
        };

        if session.is_live(Utc::now()) {
            Ok(Some(session))
        } else {
            info!("Dropping expired session of user: {}", session.user_id);
            self.repository.delete(token).await?;
            Ok(None)
        }
    }

    /// Delete a session
    pub async fn delete_session(&self, token: &str) -> Result<()> {
        if self.repository.delete(token).await? {
            info!("Session deleted");
        }

        Ok(())
    }

    /// Session token presented by the client, if any
    pub fn token_from(jar: &CookieJar) -> Option<String> {
        jar.get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    }

    /// Cookie handing the session token to the client
    pub fn session_cookie(&self, session: &Session) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, session.token.clone()))
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(cookie::time::Duration::seconds(self.ttl_seconds))
            .build()
    }

    /// Cookie that clears the session token on the client
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, "")).path("/").build()
    }
}
