// Token codec: issue, verify and the failure taxonomy

use jsonwebtoken::{encode, EncodingKey, Header};
use sentinel_shield::auth::headers::{HeaderField, PlainHeaders};
use sentinel_shield::core::errors::TokenError;
use sentinel_shield::core::models::Identity;
use sentinel_shield::core::token::TokenCodec;
use serde_json::json;
use std::time::Duration;

const SECRET: &str = "unit-test-secret";

fn identity() -> Identity {
    Identity {
        id: "0c9e4b2a-1111-4c3e-9f00-000000000001".to_string(),
        email: "owner@example.com".to_string(),
    }
}

fn sign(claims: serde_json::Value, secret: &str) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

#[test]
fn test_verify_through_plain_headers() {
    let codec = TokenCodec::new(SECRET).unwrap();
    let token = codec.issue(&identity(), Duration::from_secs(3600)).unwrap();

    let mut headers = PlainHeaders::new();
    headers.insert("Authorization", HeaderField::Single(format!("Bearer {}", token)));

    assert_eq!(codec.verify(&headers).unwrap(), identity());
}

#[test]
fn test_verify_through_header_map() {
    let codec = TokenCodec::new(SECRET).unwrap();
    let token = codec.issue(&identity(), Duration::from_secs(60)).unwrap();

    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        axum::http::header::AUTHORIZATION,
        format!("bearer {}", token).parse().unwrap(),
    );

    assert_eq!(codec.verify(&headers).unwrap(), identity());
}

#[test]
fn test_missing_and_multi_valued_header() {
    let codec = TokenCodec::new(SECRET).unwrap();
    let token = codec.issue(&identity(), Duration::from_secs(60)).unwrap();

    let empty = PlainHeaders::new();
    assert_eq!(codec.verify(&empty), Err(TokenError::MissingToken));

    let mut repeated = PlainHeaders::new();
    repeated.insert(
        "authorization",
        HeaderField::Multiple(vec![format!("Bearer {}", token), "Bearer other".to_string()]),
    );
    assert_eq!(codec.verify(&repeated), Err(TokenError::MissingToken));

    let mut bare_prefix = PlainHeaders::new();
    bare_prefix.insert("authorization", HeaderField::Single("Bearer ".to_string()));
    assert_eq!(codec.verify(&bare_prefix), Err(TokenError::MissingToken));
}

#[test]
fn test_token_without_prefix_is_accepted() {
    let codec = TokenCodec::new(SECRET).unwrap();
    let token = codec.issue(&identity(), Duration::from_secs(60)).unwrap();

    let mut headers = PlainHeaders::new();
    headers.insert("authorization", HeaderField::Single(token));

    assert_eq!(codec.verify(&headers).unwrap(), identity());
}

#[test]
fn test_expired_token() {
    let codec = TokenCodec::new(SECRET).unwrap();
    let now = chrono::Utc::now().timestamp();
    let token = sign(
        json!({"id": "u", "email": "e@example.com", "iat": now - 20, "exp": now - 10}),
        SECRET,
    );

    assert_eq!(codec.verify_token(&token), Err(TokenError::Expired));
}

#[test]
fn test_wrong_secret_and_garbage() {
    let codec = TokenCodec::new(SECRET).unwrap();
    let now = chrono::Utc::now().timestamp();
    let forged = sign(
        json!({"id": "u", "email": "e@example.com", "iat": now, "exp": now + 60}),
        "another-secret",
    );

    assert_eq!(codec.verify_token(&forged), Err(TokenError::InvalidToken));
    assert_eq!(codec.verify_token("abc.def.ghi"), Err(TokenError::InvalidToken));
}

#[test]
fn test_payload_must_carry_string_fields() {
    let codec = TokenCodec::new(SECRET).unwrap();
    let now = chrono::Utc::now().timestamp();

    let missing_email = sign(json!({"id": "u", "iat": now, "exp": now + 60}), SECRET);
    assert_eq!(codec.verify_token(&missing_email), Err(TokenError::InvalidPayload));

    let numeric_id = sign(
        json!({"id": 7, "email": "e@example.com", "iat": now, "exp": now + 60}),
        SECRET,
    );
    assert_eq!(codec.verify_token(&numeric_id), Err(TokenError::InvalidPayload));
}

#[test]
fn test_token_without_exp_rejected() {
    let codec = TokenCodec::new(SECRET).unwrap();
    let token = sign(json!({"id": "u", "email": "e@example.com"}), SECRET);

    assert_eq!(codec.verify_token(&token), Err(TokenError::InvalidToken));
}
