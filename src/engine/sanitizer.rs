// Recursive redaction of sensitive values in telemetry payloads

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

pub const REDACTED: &str = "[REDACTED]";
pub const REDACTED_EMAIL: &str = "[REDACTED_EMAIL]";
pub const REDACTED_IPV4: &str = "[REDACTED_IPV4]";
pub const REDACTED_IPV6: &str = "[REDACTED_IPV6]";
pub const REDACTED_IP: &str = "[REDACTED_IP]";

/// Key fragments whose values are dropped without inspection
pub const SENSITIVE_KEYS: [&str; 8] = [
    "password",
    "token",
    "auth",
    "session",
    "email",
    "ip",
    "ssn",
    "creditcard",
];

/// Strings longer than this (in characters) are assumed to be secrets
const MAX_PLAIN_STRING_CHARS: usize = 200;

/// Nesting deeper than this aborts the whole pass
const MAX_DEPTH: usize = 64;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));
static IPV4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("ipv4 pattern is valid"));
static IPV6_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9a-fA-F]{0,4}:){2,7}[0-9a-fA-F]{0,4}$").expect("ipv6 pattern is valid")
});

#[derive(Error, Debug)]
enum SanitizeError {
    #[error("payload nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Telemetry sanitizer
///
/// Walks arbitrary JSON, keeping its shape while replacing sensitive leaves
/// with redaction markers. A value stored under a sensitive key is replaced
/// whole, even when it is itself an object or array.
pub struct TelemetrySanitizer;

impl TelemetrySanitizer {
    /// Sanitize a payload. Never fails: on any internal error the entire
    /// input collapses to a single `[REDACTED]` marker.
    pub fn sanitize(value: &Value) -> Value {
        match Self::sanitize_value(value, 0) {
            Ok(sanitized) => sanitized,
            Err(e) => {
                warn!(error = %e, "Telemetry sanitization failed, discarding payload");
                Value::String(REDACTED.to_string())
            }
        }
    }

    fn sanitize_value(value: &Value, depth: usize) -> Result<Value, SanitizeError> {
        if depth > MAX_DEPTH {
            return Err(SanitizeError::TooDeep(MAX_DEPTH));
        }

        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
            Value::String(s) => Ok(Value::String(Self::sanitize_string(s))),
            Value::Array(items) => items
                .iter()
                .map(|item| Self::sanitize_value(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, inner) in map {
                    let sanitized = match Self::key_marker(key) {
                        Some(marker) => Value::String(marker.to_string()),
                        None => Self::sanitize_value(inner, depth + 1)?,
                    };
                    out.insert(key.clone(), sanitized);
                }
                Ok(Value::Object(out))
            }
        }
    }

    /// Classify a string leaf
    ///
    /// Checked in order: email, IPv4, IPv6, length. Survivors are trimmed, and
    /// RFC 3339 timestamps are normalized to UTC milliseconds.
    pub fn sanitize_string(raw: &str) -> String {
        let trimmed = raw.trim();

        if EMAIL_RE.is_match(trimmed) {
            return REDACTED_EMAIL.to_string();
        }
        if IPV4_RE.is_match(trimmed) {
            return REDACTED_IPV4.to_string();
        }
        if IPV6_RE.is_match(trimmed) {
            return REDACTED_IPV6.to_string();
        }
        if trimmed.chars().count() > MAX_PLAIN_STRING_CHARS {
            return REDACTED.to_string();
        }

        match DateTime::parse_from_rfc3339(trimmed) {
            Ok(ts) => ts
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            Err(_) => trimmed.to_string(),
        }
    }

    /// Redaction marker for a sensitive key, or `None` to recurse normally
    pub fn key_marker(key: &str) -> Option<&'static str> {
        let lower = key.to_lowercase();
        if !SENSITIVE_KEYS.iter().any(|fragment| lower.contains(fragment)) {
            return None;
        }

        if lower.contains("email") {
            Some(REDACTED_EMAIL)
        } else if lower.contains("ip") {
            Some(REDACTED_IP)
        } else {
            Some(REDACTED)
        }
    }
}
