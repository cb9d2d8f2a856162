//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /urls`                 - Create a short link (rate limited)
//! - `GET  /{shortId}`            - Short link redirect
//! - `GET  /urls/{shortId}`       - Link metadata
//! - `GET  /urls/{shortId}/visits` - Visit history
//! - `GET  /health`               - Health check: storage, visit queue
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on link creation
//! - **Path normalization** - Trailing slash handling

use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{create_routes, public_routes};
use crate::state::AppState;
use anyhow::Context;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes with tracing and no rate limiting.
///
/// Used directly by integration tests, which cannot provide a stable peer
/// address for the limiter.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .merge(public_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the production router.
///
/// When `state.behind_proxy` is set, the rate limiter keys on
/// `X-Forwarded-For` / `X-Real-IP` instead of the peer socket address.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn app_router(state: AppState) -> anyhow::Result<NormalizePath<Router>> {
    let create = if state.behind_proxy {
        create_routes().layer(rate_limit::proxied_layer().context("Invalid rate limit config")?)
    } else {
        create_routes().layer(rate_limit::layer().context("Invalid rate limit config")?)
    };

    let router = Router::new()
        .merge(create)
        .merge(public_routes())
        .with_state(state)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
