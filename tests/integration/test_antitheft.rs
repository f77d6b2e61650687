// Anti-theft command routes

use axum::http::StatusCode;
use sentinel_shield::core::crypto::EncryptedEnvelope;
use sentinel_shield::core::models::CommandKind;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

#[tokio::test]
async fn test_locate_accepts_numeric_strings() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let body = json!({"deviceId": "dev-1", "latitude": "12.9716", "longitude": 77.5946});
    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/locate", Some(&auth), &body))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Location updated successfully");
    assert_eq!(json["latestLocation"]["deviceId"], "dev-1");
    assert_eq!(json["latestLocation"]["userId"], "user-1");
    assert_eq!(json["latestLocation"]["latitude"], 12.9716);
    assert_eq!(store.with_data(|d| d.locations.len()), 1);
}

#[tokio::test]
async fn test_locate_rejects_out_of_range_and_missing() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let cases = [
        (json!({"deviceId": "dev-1", "latitude": 91, "longitude": 0}), "Invalid latitude or longitude values"),
        (json!({"deviceId": "dev-1", "latitude": "north", "longitude": 0}), "Invalid latitude or longitude values"),
        (json!({"deviceId": "dev-1", "latitude": 10}), "Missing required fields: deviceId, latitude, longitude"),
        (json!({"latitude": 10, "longitude": 20}), "Missing required fields: deviceId, latitude, longitude"),
    ];

    for (body, message) in cases {
        let response = create_test_app(&app_state)
            .oneshot(json_request("/antitheft/locate", Some(&auth), &body))
            .await
            .unwrap();
        let (status, json) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], message);
    }

    assert!(store.with_data(|d| d.locations.is_empty()));
}

#[tokio::test]
async fn test_lock_stores_encrypted_message() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    store.seed_device("dev-1", "user-1");
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let message = "Return this phone to the front desk";
    let body = json!({"deviceId": "dev-1", "message": message});
    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/lock", Some(&auth), &body))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": true, "message": "Lock command sent to device"}));

    let command = store.with_data(|d| d.commands[0].clone());
    assert_eq!(command.kind, CommandKind::Lock);
    assert!(command.executed_at.is_none());
    assert!(!command.data.to_string().contains(message));

    let envelope: EncryptedEnvelope =
        serde_json::from_value(command.data["message"].clone()).unwrap();
    assert_eq!(app_state.cipher.decrypt_envelope(&envelope).unwrap(), message);
}

#[tokio::test]
async fn test_lock_unowned_device_is_not_found() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    store.seed_device("dev-1", "someone-else");
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let body = json!({"deviceId": "dev-1", "message": "hello"});
    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/lock", Some(&auth), &body))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Device not found or unauthorized");
    assert!(store.with_data(|d| d.commands.is_empty()));
}

#[tokio::test]
async fn test_lock_message_length_limit() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    store.seed_device("dev-1", "user-1");
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let too_long = "x".repeat(1001);
    let response = create_test_app(&app_state)
        .oneshot(json_request(
            "/antitheft/lock",
            Some(&auth),
            &json!({"deviceId": "dev-1", "message": too_long}),
        ))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Message too long (max 1000 characters)");

    let at_limit = "x".repeat(1000);
    let response = create_test_app(&app_state)
        .oneshot(json_request(
            "/antitheft/lock",
            Some(&auth),
            &json!({"deviceId": "dev-1", "message": at_limit}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ring_records_executed_command() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/ring", Some(&auth), &json!({"deviceId": "dev-7"})))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Ring command sent to device");

    let command = store.with_data(|d| d.commands[0].clone());
    assert_eq!(command.kind, CommandKind::Ring);
    assert_eq!(command.device_id, "dev-7");
    assert!(command.executed_at.is_some());
    assert_eq!(command.data, json!({}));
}

#[tokio::test]
async fn test_ring_requires_device_id() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/ring", Some(&auth), &json!({"deviceId": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.with_data(|d| d.commands.is_empty()));
}

#[tokio::test]
async fn test_wipe_wrong_code_writes_nothing() {
    let store = MockStore::new();
    let user = store.seed_user("abcdef-1234", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let body = json!({"deviceId": "dev-1", "confirmationCode": "abcdeX"});
    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/wipe", Some(&auth), &body))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Invalid confirmation code");
    store.with_data(|d| {
        assert!(d.commands.is_empty());
        assert!(d.audits.is_empty());
    });
}

#[tokio::test]
async fn test_wipe_with_id_prefix_records_command_and_audit() {
    let store = MockStore::new();
    let user = store.seed_user("abcdef-1234", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let body = json!({"deviceId": "dev-1", "confirmationCode": "abcdef"});
    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/wipe", Some(&auth), &body))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"message": "Wipe command issued successfully"}));
    store.with_data(|d| {
        assert_eq!(d.commands.len(), 1);
        assert_eq!(d.commands[0].kind, CommandKind::Wipe);
        assert_eq!(d.audits.len(), 1);
        assert_eq!(d.audits[0].action, "device_wipe_initiated");
        assert_eq!(d.audits[0].device_id, "dev-1");
    });
}

#[tokio::test]
async fn test_wipe_missing_confirmation_code() {
    let store = MockStore::new();
    let user = store.seed_user("abcdef-1234", "owner@example.com", false);
    let app_state = create_test_app_state(store.clone());
    let auth = bearer_for(&app_state, &user);

    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/wipe", Some(&auth), &json!({"deviceId": "dev-1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    store.fail_writes();
    let app_state = create_test_app_state(store);
    let auth = bearer_for(&app_state, &user);

    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/ring", Some(&auth), &json!({"deviceId": "dev-1"})))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_locate_echoes_numeric_coordinates() {
    let store = MockStore::new();
    let user = store.seed_user("user-1", "owner@example.com", false);
    let app_state = create_test_app_state(store);
    let auth = bearer_for(&app_state, &user);

    let body = json!({"deviceId": "dev-2", "latitude": 45.0, "longitude": -73.0});
    let response = create_test_app(&app_state)
        .oneshot(json_request("/antitheft/locate", Some(&auth), &body))
        .await
        .unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["latestLocation"]["latitude"], 45.0);
    assert_eq!(json["latestLocation"]["longitude"], -73.0);
}
