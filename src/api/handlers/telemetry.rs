// Telemetry ingestion

use axum::{extract::State, response::Json, Extension};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::api::responses::{ApiError, ApiJson};
use crate::api::AppState;
use crate::core::errors::ShieldError;
use crate::core::models::{Identity, TelemetryEvent};
use crate::engine::sanitizer::TelemetrySanitizer;

#[derive(Debug, Deserialize)]
pub struct TelemetryRequest {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub data: Option<Value>,
}

/// POST /telemetry/log
///
/// Only the sanitized payload is ever written.
pub async fn telemetry_log_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(request): ApiJson<TelemetryRequest>,
) -> Result<Json<Value>, ApiError> {
    let event_type = match request.event_type.as_deref() {
        Some(t) if !t.is_empty() => t,
        _ => {
            return Err(
                ShieldError::Validation("Invalid or missing type field".to_string()).into(),
            )
        }
    };
    let Some(data) = request.data.as_ref() else {
        return Err(ShieldError::Validation("Missing data field".to_string()).into());
    };

    let event_data = TelemetrySanitizer::sanitize(data);

    app_state
        .telemetry
        .store_event(TelemetryEvent {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: identity.id.clone(),
            event_type: event_type.to_string(),
            event_data,
            timestamp: Utc::now(),
        })
        .await?;

    debug!(user_id = %identity.id, event_type = %event_type, "Telemetry event stored");

    Ok(Json(json!({ "success": true })))
}
