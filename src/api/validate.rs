// SPDX-License-Identifier: AGPL-3.0-or-later

//! Input validation for the auth and profile endpoints.
//!
//! All checks return the exact client-facing message so handlers can pass
//! them straight into a 400 response.

use crate::error::ApiError;

pub const MAX_NAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Trim and lowercase an email address. Lookup and storage both use this
/// form, so case or whitespace differences never create duplicate accounts.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Structural email check: one `@`, non-empty local part, and a domain with
/// a dot and a 2+ letter TLD. Deliverability is proven by the verification
/// email, not here.
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let invalid = || ApiError::bad_request("Please provide a valid email address");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'))
    {
        return Err(invalid());
    }

    let (_, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }
    if domain
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-'))
    {
        return Err(invalid());
    }

    Ok(())
}

/// Password policy: at least 8 characters with an uppercase letter, a
/// lowercase letter, and a digit.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::bad_request(
            "Password must be at least 8 characters long",
        ));
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_upper && has_lower && has_digit) {
        return Err(ApiError::bad_request(
            "Password must contain an uppercase letter, a lowercase letter, and a number",
        ));
    }
    Ok(())
}

/// Display name: non-empty after trimming, at most 50 characters.
pub fn validate_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::bad_request(
            "Name must be 50 characters or fewer",
        ));
    }
    Ok(name)
}
