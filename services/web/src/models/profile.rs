//! Profile model: per-user extension holding the picture and age

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Profile entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Path relative to the media root, e.g. `profile_pics/<uuid>.png`
    pub profile_pic: Option<String>,
    pub age: i32,
}

/// New profile creation payload
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub profile_pic: Option<String>,
    pub age: i32,
}
