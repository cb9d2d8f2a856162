//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Sustained requests per second per client.
const PER_SECOND: u64 = 2;
/// Requests a client may burst before throttling starts.
const BURST_SIZE: u32 = 100;

pub type RateLimitLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn build<K: KeyExtractor>(extractor: K) -> Option<RateLimitLayer<K>> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(extractor)
        .per_second(PER_SECOND)
        .burst_size(BURST_SIZE)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}

/// Creates a rate limiter keyed by the socket peer address.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Requires
/// `ConnectInfo<SocketAddr>`, so the server must be started with
/// `into_make_service_with_connect_info`.
///
/// Returns `None` only if the limits above are invalid.
pub fn layer() -> Option<RateLimitLayer<PeerIpKeyExtractor>> {
    build(PeerIpKeyExtractor)
}

/// Same limits as [`layer`], keyed by `X-Forwarded-For` / `X-Real-IP` with a
/// fallback to the peer address. Use only behind a trusted reverse proxy.
pub fn proxied_layer() -> Option<RateLimitLayer<SmartIpKeyExtractor>> {
    build(SmartIpKeyExtractor)
}
