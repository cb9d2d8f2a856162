//! API route configuration.
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity in `X-User-Id`.

use crate::api::handlers::{
    create_url_handler, health_handler, redirect_handler, url_info_handler, visits_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link creation, the only write endpoint. Rate limited in production.
///
/// - `POST /urls` - Create a short link
pub fn create_routes() -> Router<AppState> {
    Router::new().route("/urls", post(create_url_handler))
}

/// Read-side routes.
///
/// - `GET /{shortId}`               - Redirect (302)
/// - `GET /urls/{shortId}`          - Link metadata
/// - `GET /urls/{shortId}/visits`   - Visit history (paginated)
/// - `GET /health`                  - Storage and visit queue checks
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/{short_id}", get(redirect_handler))
        .route("/urls/{short_id}", get(url_info_handler))
        .route("/urls/{short_id}/visits", get(visits_handler))
        .route("/health", get(health_handler))
}
