//! Session model and related functionality

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Session entity
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session can still authenticate requests
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
