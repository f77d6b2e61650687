// Premium VPN session start

use axum::{extract::State, response::Json, Extension};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::responses::{ApiError, ApiJson};
use crate::api::AppState;
use crate::core::errors::ShieldError;
use crate::core::models::{Identity, VpnSession};

/// Documentation-range address returned until real endpoints are provisioned
pub const PLACEHOLDER_SERVER_IP: &str = "198.51.100.1";

#[derive(Debug, Deserialize)]
pub struct VpnConnectRequest {
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnConnectResponse {
    pub success: bool,
    pub session_id: String,
    pub server_location: String,
    pub server_ip: String,
    pub message: String,
}

/// POST /vpn/connect
pub async fn vpn_connect_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(request): ApiJson<VpnConnectRequest>,
) -> Result<Json<VpnConnectResponse>, ApiError> {
    let location = request
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ShieldError::Validation("Invalid location parameter".to_string()))?;

    let user = app_state
        .users
        .find_user_by_id(&identity.id)
        .await?
        .ok_or_else(|| ShieldError::NotFound("User not found".to_string()))?;

    if !user.is_premium {
        warn!(user_id = %identity.id, "VPN requested by non-premium user");
        return Err(ShieldError::Forbidden(
            "VPN service is available for premium users only".to_string(),
        )
        .into());
    }

    let session = app_state
        .vpn
        .create_session(VpnSession {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: identity.id.clone(),
            server_location: location.to_string(),
            connected_at: Utc::now(),
            is_active: true,
        })
        .await?;

    info!(user_id = %identity.id, session_id = %session.id, location = %session.server_location, "VPN session started");

    Ok(Json(VpnConnectResponse {
        success: true,
        session_id: session.id,
        server_location: session.server_location,
        server_ip: PLACEHOLDER_SERVER_IP.to_string(),
        message: "VPN connected successfully".to_string(),
    }))
}
