// Telemetry ingestion route

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

#[tokio::test]
async fn test_telemetry_is_sanitized_before_storage() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let body = json!({
        "type": "app_crash",
        "data": {
            "contact": "someone@example.com",
            "gateway": "10.0.0.1",
            "password": {"nested": "hunter2"},
            "battery": 42,
            "screen": "home"
        }
    });
    let response = create_test_app(&app_state)
        .oneshot(json_request("/telemetry/log", Some(&auth), &body))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": true}));

    let event = store.with_data(|d| d.telemetry[0].clone());
    assert_eq!(event.user_id, "user-1");
    assert_eq!(event.event_type, "app_crash");
    assert_eq!(
        event.event_data,
        json!({
            "contact": "[REDACTED_EMAIL]",
            "gateway": "[REDACTED_IPV4]",
            "password": "[REDACTED]",
            "battery": 42,
            "screen": "home"
        })
    );
}

#[tokio::test]
async fn test_telemetry_requires_type_and_data() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let cases = [
        (json!({"data": {"a": 1}}), "Invalid or missing type field"),
        (json!({"type": "", "data": {"a": 1}}), "Invalid or missing type field"),
        (json!({"type": "boot"}), "Missing data field"),
        (json!({"type": "boot", "data": null}), "Missing data field"),
    ];

    for (body, message) in cases {
        let response = create_test_app(&app_state)
            .oneshot(json_request("/telemetry/log", Some(&auth), &body))
            .await
            .unwrap();
        let (status, json) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], message);
    }

    assert!(store.with_data(|d| d.telemetry.is_empty()));
}

#[tokio::test]
async fn test_telemetry_scalar_data_accepted() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let body = json!({"type": "ping", "data": "192.168.0.10"});
    let response = create_test_app(&app_state)
        .oneshot(json_request("/telemetry/log", Some(&auth), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = store.with_data(|d| d.telemetry[0].event_data.clone());
    assert_eq!(stored, json!("[REDACTED_IPV4]"));
}
