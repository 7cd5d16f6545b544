//! Persisted entities of the web service

pub mod area_rating;
pub mod profile;
pub mod session;
pub mod user;

// Re-export for convenience
pub use area_rating::{AreaRating, DEFAULT_RATING, NewAreaRating, RATING_CHOICES};
pub use profile::{NewProfile, Profile};
pub use session::Session;
pub use user::{NewUser, User};
