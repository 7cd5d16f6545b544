//! Repositories for database operations

pub mod area_rating;
pub mod profile;
pub mod session;
pub mod user;

pub use area_rating::AreaRatingRepository;
pub use profile::ProfileRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

/// Whether an error raised by a repository is a unique constraint violation
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}
