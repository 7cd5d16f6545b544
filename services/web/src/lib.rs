//! VSafe web service
//!
//! Users register with a profile, log in with a server-side session, and rate
//! how safe an area felt at the end of a journey.

pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod registration;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod storage;
pub mod templates;
pub mod validation;

use std::sync::Arc;

use sqlx::{SqlitePool, migrate::Migrator};

use crate::{
    config::AppConfig,
    registration::RegistrationService,
    repositories::{AreaRatingRepository, ProfileRepository, SessionRepository, UserRepository},
    session::SessionManager,
    storage::MediaStorage,
    templates::Templates,
};

/// Schema migrations embedded from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub templates: Arc<Templates>,
    pub media: MediaStorage,
    pub user_repository: UserRepository,
    pub profile_repository: ProfileRepository,
    pub area_rating_repository: AreaRatingRepository,
    pub session_manager: SessionManager,
    pub registration: RegistrationService,
}

impl AppState {
    /// Wire repositories and services around a migrated pool
    pub fn new(pool: SqlitePool, config: AppConfig) -> Result<Self, tera::Error> {
        let templates = Templates::new()?;
        let media = MediaStorage::new(config.media_root.clone());

        let user_repository = UserRepository::new(pool.clone());
        let profile_repository = ProfileRepository::new(pool.clone());
        let session_manager = SessionManager::new(
            SessionRepository::new(pool.clone()),
            config.session_ttl_seconds,
            config.secure_cookies,
        );
        let registration = RegistrationService::new(
            pool.clone(),
            user_repository.clone(),
            profile_repository.clone(),
            media.clone(),
        );

        Ok(Self {
            area_rating_repository: AreaRatingRepository::new(pool.clone()),
            db_pool: pool,
            config: Arc::new(config),
            templates: Arc::new(templates),
            media,
            user_repository,
            profile_repository,
            session_manager,
            registration,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use common::database::{DatabaseConfig, init_pool, run_migrations};
    use sqlx::SqlitePool;

    /// Fresh in-memory database with the schema applied
    pub async fn memory_pool() -> SqlitePool {
        let pool = init_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool, &crate::MIGRATOR).await.unwrap();
        pool
    }
}
