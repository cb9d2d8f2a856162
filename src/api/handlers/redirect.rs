//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_info::visit_metadata;

/// Redirects a short ID to its original URL.
///
/// # Endpoint
///
/// `GET /{shortId}`
///
/// # Request Flow
///
/// 1. Atomically increment the visit counter (this is also the lookup)
/// 2. Queue the visit row for the background worker (fire-and-forget)
/// 3. Return `302 Found` with `Location` set to the original URL
///
/// The visit row may be dropped under backpressure; the counter is not.
///
/// # Errors
///
/// Returns 404 Not Found if the short ID doesn't exist.
pub async fn redirect_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let metadata = visit_metadata(&headers, Some(addr), state.behind_proxy);

    let original_url = state
        .redirect_service
        .resolve(&short_id, metadata)
        .await?;

    let location = HeaderValue::try_from(original_url).map_err(|e| {
        AppError::internal(
            "Stored URL is not a valid Location header",
            json!({ "short_id": short_id, "reason": e.to_string() }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
