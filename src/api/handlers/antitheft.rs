// Anti-theft commands: locate, lock, ring, wipe

use axum::{extract::State, response::Json, Extension};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::responses::{AckResponse, ApiError, ApiJson, MessageResponse};
use crate::api::AppState;
use crate::core::errors::ShieldError;
use crate::core::models::{AuditEntry, CommandKind, DeviceLocation, Identity, NewCommand};
use crate::utils::validation::{
    coerce_number, required_str, validate_coordinates, LOCK_MESSAGE_MAX_CHARS,
};

/// Length of the user-id prefix that confirms a wipe
const WIPE_CONFIRMATION_LEN: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateRequest {
    pub device_id: Option<String>,
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateResponse {
    pub message: String,
    pub latest_location: Option<DeviceLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRequest {
    pub device_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingRequest {
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WipeRequest {
    pub device_id: Option<String>,
    pub confirmation_code: Option<String>,
}

/// POST /antitheft/locate
pub async fn locate_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(request): ApiJson<LocateRequest>,
) -> Result<Json<LocateResponse>, ApiError> {
    const MISSING: &str = "Missing required fields: deviceId, latitude, longitude";

    let device_id = required_str(&request.device_id, MISSING)?;
    let (Some(raw_lat), Some(raw_lng)) = (&request.latitude, &request.longitude) else {
        return Err(ShieldError::Validation(MISSING.to_string()).into());
    };

    let (Some(latitude), Some(longitude)) = (coerce_number(raw_lat), coerce_number(raw_lng)) else {
        return Err(ShieldError::Validation("Invalid latitude or longitude values".to_string()).into());
    };
    validate_coordinates(latitude, longitude)?;

    app_state
        .devices
        .record_location(DeviceLocation {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: identity.id.clone(),
            device_id: device_id.to_string(),
            latitude,
            longitude,
            timestamp: Utc::now(),
        })
        .await?;

    let latest_location = app_state
        .devices
        .latest_location(&identity.id, device_id)
        .await?;

    info!(user_id = %identity.id, device_id = %device_id, "Device location recorded");

    Ok(Json(LocateResponse {
        message: "Location updated successfully".to_string(),
        latest_location,
    }))
}

/// POST /antitheft/lock
///
/// The lock-screen message is stored encrypted.
pub async fn lock_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(request): ApiJson<LockRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    const MISSING: &str = "deviceId and message are required";

    let device_id = required_str(&request.device_id, MISSING)?;
    let message = required_str(&request.message, MISSING)?;

    if message.chars().count() > LOCK_MESSAGE_MAX_CHARS {
        return Err(ShieldError::Validation(
            "Message too long (max 1000 characters)".to_string(),
        )
        .into());
    }

    if !app_state.devices.device_owned_by(device_id, &identity.id).await? {
        warn!(user_id = %identity.id, device_id = %device_id, "Lock requested for device not owned by caller");
        return Err(ShieldError::NotFound("Device not found or unauthorized".to_string()).into());
    }

    let envelope = app_state
        .cipher
        .encrypt(message)
        .map_err(ShieldError::from)?;

    app_state
        .commands
        .create_command(NewCommand {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: identity.id.clone(),
            device_id: device_id.to_string(),
            kind: CommandKind::Lock,
            data: json!({ "message": envelope }),
            created_at: Utc::now(),
            executed_at: None,
        })
        .await?;

    info!(user_id = %identity.id, device_id = %device_id, "Lock command queued");

    Ok(Json(AckResponse::ok("Lock command sent to device")))
}

/// POST /antitheft/ring
///
/// Delivery to the device is handled outside this service.
pub async fn ring_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(request): ApiJson<RingRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let device_id = required_str(&request.device_id, "Valid deviceId is required")?;
    let now = Utc::now();

    app_state
        .commands
        .create_command(NewCommand {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: identity.id.clone(),
            device_id: device_id.to_string(),
            kind: CommandKind::Ring,
            data: json!({}),
            created_at: now,
            executed_at: Some(now),
        })
        .await?;

    info!(user_id = %identity.id, device_id = %device_id, "Ring command queued");

    Ok(Json(AckResponse::ok("Ring command sent to device")))
}

/// POST /antitheft/wipe
///
/// The confirmation code is the first six characters of the caller's id.
/// Nothing is written unless it matches.
pub async fn wipe_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(request): ApiJson<WipeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let device_id = required_str(&request.device_id, "Valid deviceId is required")?;
    let confirmation_code =
        required_str(&request.confirmation_code, "Valid confirmationCode is required")?;

    let expected: String = identity.id.chars().take(WIPE_CONFIRMATION_LEN).collect();
    if confirmation_code != expected {
        warn!(user_id = %identity.id, device_id = %device_id, "Wipe rejected: confirmation code mismatch");
        return Err(ShieldError::Forbidden("Invalid confirmation code".to_string()).into());
    }

    let now = Utc::now();
    let command = NewCommand {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: identity.id.clone(),
        device_id: device_id.to_string(),
        kind: CommandKind::Wipe,
        data: json!({}),
        created_at: now,
        executed_at: Some(now),
    };
    let audit = AuditEntry {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: identity.id.clone(),
        action: "device_wipe_initiated".to_string(),
        device_id: device_id.to_string(),
        timestamp: now,
    };

    app_state.commands.create_wipe_command(command, audit).await?;

    warn!(user_id = %identity.id, device_id = %device_id, "Device wipe initiated");

    Ok(Json(MessageResponse {
        message: "Wipe command issued successfully".to_string(),
    }))
}
