//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::RATING_CHOICES;

pub const REQUIRED: &str = "This field is required.";

/// Longest accepted username, first name and last name
pub const MAX_NAME_LENGTH: usize = 150;

/// Longest accepted area label
pub const MAX_AREA_LENGTH: usize = 200;

/// Accepted age range, inclusive
pub const AGE_RANGE: (i32, i32) = (0, 150);

/// Picture extensions accepted for profile uploads
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err(REQUIRED.to_string());
    }

    if username.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Ensure this value has at most {} characters.",
            MAX_NAME_LENGTH
        ));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err(REQUIRED.to_string());
    }

    if email.len() > 254 {
        return Err("Ensure this value has at most 254 characters.".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Enter a valid email address.".to_string());
    }

    Ok(())
}

/// Longest accepted password
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err(REQUIRED.to_string());
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Ensure this value has at most {} characters.",
            MAX_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

/// Validate an optional first or last name
pub fn validate_optional_name(name: &str) -> Result<(), String> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Ensure this value has at most {} characters.",
            MAX_NAME_LENGTH
        ));
    }

    Ok(())
}

/// Parse and validate an age
pub fn validate_age(raw: &str) -> Result<i32, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(REQUIRED.to_string());
    }

    let age: i32 = raw
        .parse()
        .map_err(|_| "Enter a whole number.".to_string())?;

    let (min, max) = AGE_RANGE;
    if !(min..=max).contains(&age) {
        return Err(format!("Age must be between {} and {}.", min, max));
    }

    Ok(age)
}

/// Validate an area label
pub fn validate_area(area: &str) -> Result<(), String> {
    if area.is_empty() {
        return Err(REQUIRED.to_string());
    }

    if area.chars().count() > MAX_AREA_LENGTH {
        return Err(format!(
            "Ensure this value has at most {} characters.",
            MAX_AREA_LENGTH
        ));
    }

    Ok(())
}

/// Match a submitted star rating against the offered choices
///
/// The raw value must equal one of the choice labels exactly, so `"03"`,
/// `"+3"` or `" 3"` are not the choice `3`.
pub fn validate_rating(raw: &str) -> Result<i32, String> {
    if raw.is_empty() {
        return Err(REQUIRED.to_string());
    }

    RATING_CHOICES
        .iter()
        .copied()
        .find(|choice| choice.to_string() == raw)
        .ok_or_else(|| {
            format!(
                "Select a valid choice. {} is not one of the available choices.",
                raw
            )
        })
}

/// Validate an uploaded picture and return its normalised extension
pub fn validate_image(
    file_name: &str,
    content_type: Option<&str>,
    size: usize,
) -> Result<String, String> {
    if size == 0 {
        return Err("The submitted file is empty.".to_string());
    }

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));

    let is_image = content_type.is_some_and(|ct| ct.starts_with("image/"));

    match extension {
        Some(extension) if is_image => Ok(extension),
        _ => Err(
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image."
                .to_string(),
        ),
    }
}
