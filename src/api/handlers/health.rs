//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Reachable, 42 links" },
///     "visit_queue": { "status": "ok", "message": "Capacity: 9998/10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let visit_queue = check_visit_queue(&state);

    let all_healthy = storage.is_ok() && visit_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            visit_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    if let Err(e) = state.url_repository.ping().await {
        return CheckStatus::error(format!("Storage error: {e}"));
    }

    match state.url_repository.count().await {
        Ok(count) => CheckStatus::ok(format!("Reachable, {count} links")),
        Err(e) => CheckStatus::error(format!("Storage error: {e}")),
    }
}

fn check_visit_queue(state: &AppState) -> CheckStatus {
    let recorder = &state.visit_recorder;

    if recorder.is_closed() {
        CheckStatus::error("Visit queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Capacity: {}/{}",
            recorder.available_capacity(),
            recorder.max_capacity()
        ))
    }
}
