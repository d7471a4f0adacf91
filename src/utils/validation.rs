//! Input validation utilities

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::AppError;

/// Maximum decoded photo size (5MB)
const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// Regex for validating phone numbers
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 .-]*$").unwrap());

/// Validate a phone number
pub fn validate_phone(phone: &str) -> bool {
    let len = phone.len();
    (6..=20).contains(&len) && PHONE_REGEX.is_match(phone)
}

/// Validate a division name
pub fn validate_division_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.len() <= 100
}

/// Decode a base64-encoded employee photo and verify it is a still image.
///
/// The payload must decode to bytes the `image` crate recognizes as a
/// supported format (PNG, JPEG, WebP, ...); anything else is rejected.
pub fn decode_photo(encoded: &str) -> Result<Vec<u8>, AppError> {
    let data = BASE64
        .decode(encoded.trim())
        .map_err(|e| AppError::validation(format!("Photo is not valid base64: {}", e)))?;

    if data.is_empty() {
        return Err(AppError::validation("Photo payload is empty"));
    }

    if data.len() > MAX_PHOTO_SIZE {
        return Err(AppError::validation(format!(
            "Photo too large. Maximum size is {} bytes ({}MB)",
            MAX_PHOTO_SIZE,
            MAX_PHOTO_SIZE / 1024 / 1024
        )));
    }

    if let Err(e) = image::load_from_memory(&data) {
        return Err(AppError::validation(format!(
            "Photo is not a recognized image: {}",
            e
        )));
    }

    Ok(data)
}
