// Request field validators

use sentinel_shield::core::errors::ShieldError;
use sentinel_shield::utils::validation::*;

#[test]
fn test_email_format() {
    assert!(validate_email("owner@example.com").is_ok());
    assert!(validate_email("first.last+tag@sub.example.co").is_ok());
    assert!(validate_email("no-at-sign.com").is_err());
    assert!(validate_email("two@@example.com").is_err());
    assert!(validate_email("spaces in@example.com").is_err());
    assert!(validate_email("missing@tld").is_err());
}

#[test]
fn test_name_length_counts_characters() {
    assert!(validate_name("Al").is_ok());
    assert!(validate_name("Ω").is_err());
    assert!(validate_name("Éé").is_ok());
    assert!(validate_name(&"n".repeat(100)).is_ok());
    assert!(validate_name(&"n".repeat(101)).is_err());
}

#[test]
fn test_hash_length_window() {
    assert!(validate_hash(&"a".repeat(32)).is_ok());
    assert!(validate_hash(&"F".repeat(128)).is_ok());
    assert!(validate_hash(&"a".repeat(31)).is_err());
    assert!(validate_hash(&"a".repeat(129)).is_err());
    assert!(validate_hash(&format!("{}g", "a".repeat(40))).is_err());
}

#[test]
fn test_required_str() {
    let present = Some("dev-1".to_string());
    let empty = Some(String::new());

    assert_eq!(required_str(&present, "needed").unwrap(), "dev-1");
    assert!(matches!(
        required_str(&empty, "needed"),
        Err(ShieldError::Validation(msg)) if msg == "needed"
    ));
    assert!(required_str(&None, "needed").is_err());
}

#[test]
fn test_validation_errors_are_400() {
    let err = validate_password("short").unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.user_message().starts_with("Password must be"));
}
