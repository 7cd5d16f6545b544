//! Account registration: one user and its profile, written atomically

use anyhow::Result;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, warn};

use crate::{
    error::AppResult,
    forms::{FieldErrors, RegistrationForm, Validate, ValidProfile},
    models::{NewProfile, NewUser, Profile, User},
    repositories::{ProfileRepository, UserRepository, is_unique_violation},
    storage::MediaStorage,
};

pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

/// Result of a registration attempt
#[derive(Debug)]
pub enum RegistrationOutcome {
    Registered {
        user: User,
        profile: Profile,
    },
    Invalid {
        user_errors: FieldErrors,
        profile_errors: FieldErrors,
    },
}

/// Registration workflow
#[derive(Clone)]
pub struct RegistrationService {
    pool: SqlitePool,
    users: UserRepository,
    profiles: ProfileRepository,
    storage: MediaStorage,
}

impl RegistrationService {
    pub fn new(
        pool: SqlitePool,
        users: UserRepository,
        profiles: ProfileRepository,
        storage: MediaStorage,
    ) -> Self {
        Self {
            pool,
            users,
            profiles,
            storage,
        }
    }

    /// Validate both halves of the form and, when both pass, create the
    /// user and its profile in one transaction
    pub async fn register(&self, form: &RegistrationForm) -> AppResult<RegistrationOutcome> {
        let (new_user, mut user_errors) = match form.user.validate() {
            Ok(new_user) => (Some(new_user), FieldErrors::new()),
            Err(errors) => (None, errors),
        };

        let username = form.user.username.trim();
        if user_errors.get("username").is_empty() && self.users.username_exists(username).await? {
            user_errors.add("username", DUPLICATE_USERNAME);
        }

        let profile = form.profile.validate();

        let (new_user, profile) = match (new_user, profile) {
            (Some(new_user), Ok(profile)) if user_errors.is_empty() => (new_user, profile),
            (_, profile) => {
                return Ok(RegistrationOutcome::Invalid {
                    user_errors,
                    profile_errors: profile.err().unwrap_or_default(),
                });
            }
        };

        match self.persist(&new_user, &profile).await {
            Ok((user, profile)) => {
                info!("Registered user {} with profile {}", user.username, profile.id);
                Ok(RegistrationOutcome::Registered { user, profile })
            }
            Err(e) if is_unique_violation(&e) => {
                warn!("Username {} was taken concurrently", new_user.username);
                let mut user_errors = FieldErrors::new();
                user_errors.add("username", DUPLICATE_USERNAME);
                Ok(RegistrationOutcome::Invalid {
                    user_errors,
                    profile_errors: FieldErrors::new(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write both records; on any failure roll back and drop the stored picture
    async fn persist(&self, new_user: &NewUser, profile: &ValidProfile) -> Result<(User, Profile)> {
        let mut tx = self.pool.begin().await?;
        let mut stored_pic = None;

        let written = self
            .write_records(&mut tx, new_user, profile, &mut stored_pic)
            .await;

        let result = match written {
            Ok(records) => tx.commit().await.map(|_| records).map_err(Into::into),
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!("Registration rollback failed: {}", rollback_error);
                }
                Err(e)
            }
        };

        if result.is_err() {
            if let Some(path) = &stored_pic {
                self.storage.discard(path).await;
            }
        }

        result
    }

    async fn write_records(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        new_user: &NewUser,
        profile: &ValidProfile,
        stored_pic: &mut Option<String>,
    ) -> Result<(User, Profile)> {
        let user = self.users.create(&mut **tx, new_user).await?;

        if let Some(picture) = &profile.picture {
            *stored_pic = Some(self.storage.save_profile_pic(picture).await?);
        }

        let profile = self
            .profiles
            .create(
                &mut **tx,
                &NewProfile {
                    user_id: user.id,
                    profile_pic: stored_pic.clone(),
                    age: profile.age,
                },
            )
            .await?;

        Ok((user, profile))
    }
}
