use once_cell::sync::Lazy;
use regex::Regex;

use super::AuthError;

pub const MAX_EMAIL_LEN: usize = 120;
pub const MAX_NAME_LEN: usize = 100;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// `local@domain.tld`, case-insensitive. `None` (absent email) is invalid.
pub fn validate_email(email: Option<&str>) -> Result<&str, AuthError> {
    match email {
        Some(e) if e.len() <= MAX_EMAIL_LEN && EMAIL_REGEX.is_match(e) => Ok(e),
        other => Err(AuthError::InvalidEmail(other.map(str::to_string))),
    }
}

pub fn validate_name(name: &str) -> Result<(), AuthError> {
    if name.trim().is_empty() {
        return Err(AuthError::Validation("Name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AuthError::Validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.trim().is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }
    Ok(())
}
