// Request field validation - fail fast before touching the database

use crate::core::errors::ShieldError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));
static HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{32,128}$").expect("hash pattern is valid"));

const PASSWORD_SPECIALS: &str = "@$!%*?&";
const PASSWORD_MIN_LEN: usize = 8;
const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
pub const LOCK_MESSAGE_MAX_CHARS: usize = 1000;

pub fn validate_email(email: &str) -> Result<(), ShieldError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ShieldError::Validation("Invalid email format".to_string()))
    }
}

/// At least 8 characters from `[A-Za-z0-9@$!%*?&]`, with one each of
/// lower, upper, digit and special
pub fn validate_password(password: &str) -> Result<(), ShieldError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    let long_enough = password.chars().count() >= PASSWORD_MIN_LEN;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if allowed && long_enough && has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        Err(ShieldError::Validation(
            "Password must be at least 8 characters and contain uppercase, lowercase, number, and special character"
                .to_string(),
        ))
    }
}

pub fn validate_name(name: &str) -> Result<(), ShieldError> {
    let len = name.chars().count();
    if (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(ShieldError::Validation(
            "Name must be between 2 and 100 characters".to_string(),
        ))
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ShieldError> {
    let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
    let lng_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
    if lat_ok && lng_ok {
        Ok(())
    } else {
        Err(ShieldError::Validation(
            "Invalid latitude or longitude values".to_string(),
        ))
    }
}

pub fn validate_hash(hash: &str) -> Result<(), ShieldError> {
    if HASH_RE.is_match(hash) {
        Ok(())
    } else {
        Err(ShieldError::Validation(
            "Invalid hash format. Expected hex string.".to_string(),
        ))
    }
}

/// Read a coordinate given as a JSON number or a numeric string
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Borrow a string field that must be present and non-empty
pub fn required_str<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ShieldError> {
    match value.as_deref() {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ShieldError::Validation(message.to_string())),
    }
}
