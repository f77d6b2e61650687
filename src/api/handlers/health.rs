// Liveness endpoint

use axum::{extract::State, http::StatusCode, response::Json};
use std::time::Duration;
use tracing::warn;

use crate::api::responses::HealthResponse;
use crate::api::AppState;

const DB_PING_TIMEOUT: Duration = Duration::from_millis(500);

/// GET /health
///
/// 200 when the database answers, 503 otherwise. Body shape is the same.
pub async fn health_handler(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = match tokio::time::timeout(DB_PING_TIMEOUT, app_state.health.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(error = %e, "Health check: database ping failed");
            false
        }
        Err(_) => {
            warn!("Health check: database ping timed out");
            false
        }
    };

    let (status, label, database) = if db_ok {
        (StatusCode::OK, "healthy", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            database: database.to_string(),
        }),
    )
}
