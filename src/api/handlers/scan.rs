// Scan reporting and file hash reputation

use axum::{extract::State, response::Json, Extension};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::api::responses::{AckResponse, ApiError, ApiJson};
use crate::api::AppState;
use crate::core::errors::ShieldError;
use crate::core::models::{Identity, ScanRecord, ThreatInfo};
use crate::utils::validation::validate_hash;

const QUICK_SCAN: &str = "quick";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickScanRequest {
    pub device_id: Option<String>,
    pub results: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct HashCheckRequest {
    pub hash: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashCheckResponse {
    pub is_threat: bool,
    #[serde(flatten)]
    pub threat: Option<ThreatInfo>,
}

/// Parsed `results` object of a quick scan
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScanResults {
    threats_found: i64,
    scanned_files: i64,
    duration: f64,
}

fn non_negative_count(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(Value::as_i64).filter(|n| *n >= 0)
}

fn parse_results(results: Option<&Value>) -> Result<ScanResults, ShieldError> {
    let invalid = || {
        ShieldError::Validation(
            "Invalid results: expected { threatsFound:number, scannedFiles:number, duration:number }"
                .to_string(),
        )
    };

    let obj = results.and_then(Value::as_object).ok_or_else(invalid)?;
    let threats_found = non_negative_count(obj, "threatsFound").ok_or_else(invalid)?;
    let scanned_files = non_negative_count(obj, "scannedFiles").ok_or_else(invalid)?;
    let duration = obj
        .get("duration")
        .and_then(Value::as_f64)
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(invalid)?;

    Ok(ScanResults {
        threats_found,
        scanned_files,
        duration,
    })
}

/// POST /scan/quick
///
/// Logs the scan and bumps the caller's scan counters in one transaction.
pub async fn quick_scan_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(request): ApiJson<QuickScanRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let device_id = request
        .device_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ShieldError::Validation("Invalid deviceId".to_string()))?;

    let results = parse_results(request.results.as_ref())?;

    app_state
        .scans
        .record_scan(ScanRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: identity.id.clone(),
            device_id: device_id.to_string(),
            scan_type: QUICK_SCAN.to_string(),
            threats_found: results.threats_found,
            files_scanned: results.scanned_files,
            duration: results.duration,
            timestamp: Utc::now(),
        })
        .await?;

    info!(
        user_id = %identity.id,
        device_id = %device_id,
        threats_found = results.threats_found,
        scanned_files = results.scanned_files,
        "Quick scan recorded"
    );

    Ok(Json(AckResponse::ok("Scan completed successfully")))
}

/// POST /scan/hash-check
pub async fn hash_check_handler(
    State(app_state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(request): ApiJson<HashCheckRequest>,
) -> Result<Json<HashCheckResponse>, ApiError> {
    let hash = match request.hash.as_deref() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(ShieldError::Validation("Hash is required".to_string()).into()),
    };
    validate_hash(hash)?;

    let threat = app_state.threat_intel.lookup_hash(hash).await?;

    match &threat {
        Some(info) => warn!(user_id = %identity.id, threat = %info.name, "Hash matched known threat"),
        None => debug!(user_id = %identity.id, "Hash not found in threat database"),
    }

    Ok(Json(HashCheckResponse {
        is_threat: threat.is_some(),
        threat,
    }))
}
