//! Handler for short link metadata.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::url::UrlInfoResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns metadata for a short link without counting a visit.
///
/// # Endpoint
///
/// `GET /urls/{shortId}`
///
/// # Errors
///
/// Returns 404 Not Found if the short ID doesn't exist.
pub async fn url_info_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Json<UrlInfoResponse>, AppError> {
    let record = state.url_service.find_by_short_id(&short_id).await?;
    let short_url = state.url_service.short_url(&record.short_id);

    Ok(Json(UrlInfoResponse::from_record(record, short_url)))
}
