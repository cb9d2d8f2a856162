//! Handler for short link creation.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::url::{CreateUrlRequest, CreateUrlResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_info::owner_id;

/// Shortens a single URL.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/path" }
/// ```
///
/// An `X-User-Id` header, when present, records the owner of the link.
///
/// # Response
///
/// `201 Created`:
///
/// ```json
/// {
///   "shortUrl": "https://sho.rt/aB3xY9k",
///   "originalUrl": "https://example.com/path",
///   "shortId": "aB3xY9k"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request for a malformed body, an unacceptable URL or an
///   oversize `X-User-Id`
/// - 503 Service Unavailable if no free short ID was found
pub async fn create_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;
    let owner = owner_id(&headers)?;

    let record = state
        .url_service
        .create(&payload.original_url, owner)
        .await?;

    let response = CreateUrlResponse {
        short_url: state.url_service.short_url(&record.short_id),
        original_url: record.original_url,
        short_id: record.short_id,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
