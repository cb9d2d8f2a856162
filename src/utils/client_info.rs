//! Request metadata extraction for visits and ownership.

use axum::http::{HeaderMap, HeaderName, header};
use serde_json::json;
use std::net::SocketAddr;

use crate::domain::entities::VisitMetadata;
use crate::error::AppError;

/// Header set by the authentication gateway with the verified user identity.
pub static USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

static X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
static X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

/// Longest header value copied into a visit row.
const MAX_HEADER_LEN: usize = 512;

/// Longest accepted owner identity, in bytes.
pub const MAX_OWNER_LEN: usize = 512;

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn truncate(value: &str) -> &str {
    if value.len() <= MAX_HEADER_LEN {
        return value;
    }
    let mut end = MAX_HEADER_LEN;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Resolves the client IP.
///
/// With `behind_proxy`, the first `X-Forwarded-For` entry (then `X-Real-IP`)
/// wins over the socket peer address.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<String> {
    if behind_proxy {
        let forwarded = header_str(headers, &X_FORWARDED_FOR)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| header_str(headers, &X_REAL_IP));

        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}

/// Builds best-effort visit metadata from a request.
pub fn visit_metadata(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> VisitMetadata {
    VisitMetadata::new(
        client_ip(headers, peer, behind_proxy),
        header_str(headers, &header::USER_AGENT).map(truncate),
        header_str(headers, &header::REFERER).map(truncate),
    )
}

/// Returns the owner identity forwarded by the authentication gateway.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for an identity longer than
/// [`MAX_OWNER_LEN`]; it is never shortened.
pub fn owner_id(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    match header_str(headers, &USER_ID_HEADER) {
        Some(owner) if owner.len() > MAX_OWNER_LEN => Err(AppError::bad_request(
            "Owner identity is too long",
            json!({ "header": USER_ID_HEADER.as_str(), "max_len": MAX_OWNER_LEN }),
        )),
        owner => Ok(owner.map(str::to_string)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("127.0.0.1:12345".parse().unwrap())
    }

    #[test]
    fn test_peer_ip_used_by_default() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));

        assert_eq!(client_ip(&headers, peer(), false).as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_forwarded_for_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.2"),
        );

        assert_eq!(client_ip(&headers, peer(), true).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));

        assert_eq!(client_ip(&headers, None, true).as_deref(), Some("198.51.100.4"));
    }

    #[test]
    fn test_metadata_without_headers_or_peer() {
        let metadata = visit_metadata(&HeaderMap::new(), None, false);
        assert_eq!(metadata, VisitMetadata::default());
    }

    #[test]
    fn test_metadata_truncates_long_user_agent() {
        let mut headers = HeaderMap::new();
        let long = "x".repeat(MAX_HEADER_LEN * 2);
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&long).unwrap());

        let metadata = visit_metadata(&headers, peer(), false);
        assert_eq!(metadata.user_agent.unwrap().len(), MAX_HEADER_LEN);
    }

    #[test]
    fn test_owner_id() {
        let mut headers = HeaderMap::new();
        assert!(owner_id(&headers).unwrap().is_none());

        headers.insert("x-user-id", HeaderValue::from_static("user_42"));
        assert_eq!(owner_id(&headers).unwrap().as_deref(), Some("user_42"));
    }

    #[test]
    fn test_owner_id_at_limit_is_kept_whole() {
        let mut headers = HeaderMap::new();
        let owner = "u".repeat(MAX_OWNER_LEN);
        headers.insert("x-user-id", HeaderValue::from_str(&owner).unwrap());

        assert_eq!(owner_id(&headers).unwrap(), Some(owner));
    }

    #[test]
    fn test_owner_id_over_limit_is_rejected() {
        let mut headers = HeaderMap::new();
        let owner = "u".repeat(MAX_OWNER_LEN + 1);
        headers.insert("x-user-id", HeaderValue::from_str(&owner).unwrap());

        assert!(matches!(
            owner_id(&headers),
            Err(AppError::Validation { .. })
        ));
    }
}
