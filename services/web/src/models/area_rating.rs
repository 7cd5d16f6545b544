//! Area rating model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Accepted star ratings
pub const RATING_CHOICES: [i32; 5] = [1, 2, 3, 4, 5];

/// Rating preselected on an empty form
pub const DEFAULT_RATING: i32 = 3;

/// Area rating entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AreaRating {
    pub id: Uuid,
    pub area: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

/// New area rating payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAreaRating {
    pub area: String,
    pub rating: i32,
}
