//! Area rating repository for database operations

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::models::{AreaRating, NewAreaRating};

/// Area rating repository
#[derive(Clone)]
pub struct AreaRatingRepository {
    pool: SqlitePool,
}

impl AreaRatingRepository {
    /// Create a new area rating repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a rating
    pub async fn create(&self, new_rating: &NewAreaRating) -> Result<AreaRating> {
        info!("Storing rating {} for area: {}", new_rating.rating, new_rating.area);

        let rating = sqlx::query_as::<_, AreaRating>(
            r#"
            INSERT INTO area_ratings (id, area, rating, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, area, rating, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_rating.area)
        .bind(new_rating.rating)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    #[tokio::test]
    async fn test_create_stores_rating() {
        let pool = memory_pool().await;
        let repository = AreaRatingRepository::new(pool);

        let stored = repository
            .create(&NewAreaRating {
                area: "Harbour Road".to_string(),
                rating: 4,
            })
            .await
            .unwrap();
        assert_eq!(stored.rating, 4);
        assert_eq!(stored.area, "Harbour Road");
    }

    #[tokio::test]
    async fn test_store_rejects_out_of_range_rating() {
        let pool = memory_pool().await;
        let repository = AreaRatingRepository::new(pool);

        let result = repository
            .create(&NewAreaRating {
                area: "Harbour Road".to_string(),
                rating: 6,
            })
            .await;

        assert!(result.is_err());
    }
}
