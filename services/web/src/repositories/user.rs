//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, User};

/// Hash a clear text password into an Argon2 PHC string
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// Runs on the given executor so the insert can join a caller's
    /// transaction.
    pub async fn create<'e, E>(&self, executor: E, new_user: &NewUser) -> Result<User>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        info!("Creating new user: {}", new_user.username);

        let password_hash = hash_password(&new_user.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, first_name, last_name, is_active, date_joined)
            VALUES ($1, $2, $3, $4, $5, $6, 1, $7)
            RETURNING id, username, email, password_hash, first_name, last_name, is_active, date_joined, last_login
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        info!("Finding user by username: {}", username);

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name, is_active, date_joined, last_login
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name, is_active, date_joined, last_login
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Whether the username is already registered
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Record a successful login
    pub async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Activate or deactivate an account
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool> {
        info!("Setting user {} active: {}", id, is_active);

        let result = sqlx::query("UPDATE users SET is_active = $1 WHERE id = $2")
            .bind(is_active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "Walk1ng!Home".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_stores_hashed_password() {
        let pool = memory_pool().await;
        let repository = UserRepository::new(pool.clone());

        let user = repository.create(&pool, &new_user("ada")).await.unwrap();

        assert_ne!(user.password_hash, "Walk1ng!Home");
        assert!(user.password_hash.starts_with("$argon2"));
        assert!(user.is_active);
        assert!(user.last_login.is_none());
        assert!(repository.verify_password(&user, "Walk1ng!Home").unwrap());
        assert!(!repository.verify_password(&user, "wrong").unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let pool = memory_pool().await;
        let repository = UserRepository::new(pool.clone());

        repository.create(&pool, &new_user("ada")).await.unwrap();
        let error = repository
            .create(&pool, &new_user("ada"))
            .await
            .unwrap_err();

        assert!(crate::repositories::is_unique_violation(&error));
    }

    #[tokio::test]
    async fn test_lookup_and_flags() {
        let pool = memory_pool().await;
        let repository = UserRepository::new(pool.clone());
        let user = repository.create(&pool, &new_user("grace")).await.unwrap();

        assert!(repository.username_exists("grace").await.unwrap());
        assert!(!repository.username_exists("Grace").await.unwrap());

        let found = repository.find_by_username("grace").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        assert!(repository.set_active(user.id, false).await.unwrap());
        let now = Utc::now();
        repository.record_login(user.id, now).await.unwrap();

        let reloaded = repository.find_by_id(user.id).await.unwrap().unwrap();
        assert!(!reloaded.is_active);
        assert!(reloaded.last_login.is_some());
    }

    #[test]
    fn test_hash_password_is_salted() {
        let first = hash_password("Walk1ng!Home").unwrap();
        let second = hash_password("Walk1ng!Home").unwrap();
        assert_ne!(first, second);
    }
}
