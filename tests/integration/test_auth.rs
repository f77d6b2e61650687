// Bearer authentication on protected routes

use axum::http::StatusCode;
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::ExposeSecret;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

const PROTECTED: [&str; 8] = [
    "/antitheft/locate",
    "/antitheft/lock",
    "/antitheft/ring",
    "/antitheft/wipe",
    "/scan/quick",
    "/scan/hash-check",
    "/telemetry/log",
    "/vpn/connect",
];

#[tokio::test]
async fn test_protected_routes_require_token() {
    let store = MockStore::new();
    let app_state = create_test_app_state(store.clone());

    for uri in PROTECTED {
        let response = create_test_app(&app_state)
            .oneshot(json_request(uri, None, &json!({})))
            .await
            .unwrap();
        let (status, json) = read_json(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(json, json!({"error": "Unauthorized"}));
    }

    store.with_data(|d| {
        assert!(d.commands.is_empty());
        assert!(d.scans.is_empty());
        assert!(d.telemetry.is_empty());
    });
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app_state = create_test_app_state(MockStore::new());

    let response = create_test_app(&app_state)
        .oneshot(json_request(
            "/antitheft/ring",
            Some("Bearer not.a.jwt"),
            &json!({"deviceId": "dev-1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let app_state = create_test_app_state(MockStore::new());
    let now = chrono::Utc::now().timestamp();
    let claims = json!({"id": "user-1", "email": "a@example.com", "iat": now, "exp": now + 600});
    let forged = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let response = create_test_app(&app_state)
        .oneshot(json_request(
            "/antitheft/ring",
            Some(&format!("Bearer {}", forged)),
            &json!({"deviceId": "dev-1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app_state = create_test_app_state(MockStore::new());
    let now = chrono::Utc::now().timestamp();
    let claims = json!({"id": "user-1", "email": "a@example.com", "iat": now - 7200, "exp": now - 3600});
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(app_state.config.jwt_secret.expose_secret().as_bytes()),
    )
    .unwrap();

    let response = create_test_app(&app_state)
        .oneshot(json_request(
            "/antitheft/ring",
            Some(&format!("Bearer {}", expired)),
            &json!({"deviceId": "dev-1"}),
        ))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Unauthorized");
}

#[tokio::test]
async fn test_bearer_prefix_is_case_insensitive() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    let app_state = create_test_app_state(store);
    let token = bearer_for(&app_state, &user).replacen("Bearer", "bEaReR", 1);

    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/ring", Some(&token), &json!({"deviceId": "dev-1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app_state = create_test_app_state(MockStore::new());

    let response = create_test_app(&app_state)
        .oneshot(get_request("/subscription/plans"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_test_app(&app_state)
        .oneshot(get_request("/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
