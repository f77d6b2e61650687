// Subscription catalog

use axum::response::Json;

use crate::api::responses::PlansResponse;
use crate::core::plans::plan_catalog;

/// GET /subscription/plans
pub async fn plans_handler() -> Json<PlansResponse> {
    Json(PlansResponse {
        plans: plan_catalog(),
    })
}
