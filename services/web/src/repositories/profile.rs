//! Profile repository for database operations

use anyhow::Result;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewProfile, Profile};

/// Profile repository
#[derive(Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the profile of a user
    pub async fn create<'e, E>(&self, executor: E, new_profile: &NewProfile) -> Result<Profile>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        info!("Creating profile for user: {}", new_profile.user_id);

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, user_id, profile_pic, age)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, profile_pic, age
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_profile.user_id)
        .bind(&new_profile.profile_pic)
        .bind(new_profile.age)
        .fetch_one(executor)
        .await?;

        Ok(profile)
    }

    /// Find the profile owned by a user
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, profile_pic, age
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::NewUser, repositories::UserRepository, test_support::memory_pool};

    #[tokio::test]
    async fn test_profile_requires_existing_user() {
        let pool = memory_pool().await;
        let repository = ProfileRepository::new(pool.clone());

        let result = repository
            .create(
                &pool,
                &NewProfile {
                    user_id: Uuid::new_v4(),
                    profile_pic: None,
                    age: 30,
                },
            )
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_one_profile_per_user() {
        let pool = memory_pool().await;
        let users = UserRepository::new(pool.clone());
        let repository = ProfileRepository::new(pool.clone());

        let user = users
            .create(
                &pool,
                &NewUser {
                    username: "ada".to_string(),
                    email: "ada@example.com".to_string(),
                    password: "Walk1ng!Home".to_string(),
                    first_name: String::new(),
                    last_name: String::new(),
                },
            )
            .await
            .unwrap();

        let new_profile = NewProfile {
            user_id: user.id,
            profile_pic: Some("profile_pics/ada.png".to_string()),
            age: 36,
        };
        let profile = repository.create(&pool, &new_profile).await.unwrap();
        assert_eq!(profile.age, 36);

        let second = repository.create(&pool, &new_profile).await;
        assert!(second.is_err());

        let found = repository.find_by_user_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.id, profile.id);
        assert_eq!(found.profile_pic.as_deref(), Some("profile_pics/ada.png"));
    }
}
