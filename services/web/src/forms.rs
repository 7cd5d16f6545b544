//! Typed request payloads and their validation
//!
//! Every submitted form is deserialized into a DTO whose fields are kept as
//! raw strings, then checked by [`Validate`], which yields either the typed
//! value ready for persistence or the collected [`FieldErrors`].

use axum::{body::Bytes, extract::Multipart};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    error::AppError,
    models::{DEFAULT_RATING, NewAreaRating, NewUser},
    validation,
};

/// Per-field validation messages, keyed by form field name
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record the outcome of a field check
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded against a field
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Explicit validation step for a submitted form
pub trait Validate {
    type Output;

    fn validate(&self) -> Result<Self::Output, FieldErrors>;
}

/// Account half of the registration form
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Validate for UserForm {
    type Output = NewUser;

    fn validate(&self) -> Result<NewUser, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = self.username.trim();
        let email = self.email.trim();
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();

        errors.check("username", validation::validate_username(username));
        errors.check("email", validation::validate_email(email));
        errors.check("password", validation::validate_password(&self.password));
        errors.check("first_name", validation::validate_optional_name(first_name));
        errors.check("last_name", validation::validate_optional_name(last_name));

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }
}

/// A file part received with a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Profile half of the registration form
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProfileForm {
    pub age: String,
    #[serde(skip_serializing)]
    pub profile_pic: Option<UploadedFile>,
}

/// A picture that passed validation, ready to be stored
#[derive(Debug, Clone)]
pub struct ValidPicture {
    pub extension: String,
    pub bytes: Bytes,
}

/// Validated profile values
#[derive(Debug, Clone)]
pub struct ValidProfile {
    pub age: i32,
    pub picture: Option<ValidPicture>,
}

impl Validate for ProfileForm {
    type Output = ValidProfile;

    fn validate(&self) -> Result<ValidProfile, FieldErrors> {
        let mut errors = FieldErrors::new();

        let age = errors.check("age", validation::validate_age(&self.age));

        let picture = match &self.profile_pic {
            Some(file) => errors
                .check(
                    "profile_pic",
                    validation::validate_image(
                        &file.file_name,
                        file.content_type.as_deref(),
                        file.bytes.len(),
                    ),
                )
                .map(|extension| ValidPicture {
                    extension,
                    bytes: file.bytes.clone(),
                }),
            None => None,
        };

        match age {
            Some(age) if errors.is_empty() => Ok(ValidProfile { age, picture }),
            _ => Err(errors),
        }
    }
}

/// Both halves of a registration submission
#[derive(Debug, Default, Clone)]
pub struct RegistrationForm {
    pub user: UserForm,
    pub profile: ProfileForm,
}

impl RegistrationForm {
    /// Read the registration fields from a multipart body
    ///
    /// Unknown parts are ignored. A file part submitted without a file name
    /// (an empty file input) counts as no picture.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "profile_pic" => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;

                    if let Some(file_name) = file_name.filter(|n| !n.is_empty()) {
                        form.profile.profile_pic = Some(UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        });
                    }
                }
                "username" => form.user.username = field.text().await?,
                "email" => form.user.email = field.text().await?,
                "password" => form.user.password = field.text().await?,
                "first_name" => form.user.first_name = field.text().await?,
                "last_name" => form.user.last_name = field.text().await?,
                "age" => form.profile.age = field.text().await?,
                _ => {}
            }
        }

        Ok(form)
    }
}

/// Login form
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Area rating form
///
/// Missing fields deserialize as empty strings so they fail validation as
/// required fields; only an unbound form starts at the default rating.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RatingForm {
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub rating: String,
}

impl Default for RatingForm {
    fn default() -> Self {
        Self {
            area: String::new(),
            rating: DEFAULT_RATING.to_string(),
        }
    }
}

impl Validate for RatingForm {
    type Output = NewAreaRating;

    fn validate(&self) -> Result<NewAreaRating, FieldErrors> {
        let mut errors = FieldErrors::new();
        let area = self.area.trim();

        errors.check("area", validation::validate_area(area));
        let rating = errors.check("rating", validation::validate_rating(&self.rating));

        match rating {
            Some(rating) if errors.is_empty() => Ok(NewAreaRating {
                area: area.to_string(),
                rating,
            }),
            _ => Err(errors),
        }
    }
}
