//! Handler for the visit history of a short link.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde_json::json;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::visits::{PaginationMeta, VisitInfo, VisitsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists recorded visits for a short link, newest first.
///
/// # Endpoint
///
/// `GET /urls/{shortId}/visits`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 25, max: 100)
///
/// `visitCount` is the record's counter; `pagination.total_items` counts the
/// stored rows and may lag behind it.
///
/// # Errors
///
/// Returns 404 Not Found if the short ID doesn't exist.
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn visits_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<VisitsResponse>, AppError> {
    let Query(params) = params.map_err(|rejection| {
        AppError::bad_request(
            "Invalid query parameters",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let page = state
        .visit_service
        .list_visits(&short_id, offset, limit)
        .await?;

    Ok(Json(VisitsResponse {
        pagination: PaginationMeta::new(params.page(), params.page_size(), page.total),
        short_id: page.record.short_id,
        visit_count: page.record.visit_count,
        items: page.items.into_iter().map(VisitInfo::from).collect(),
    }))
}
