//! Acceptance rules for original URLs.
//!
//! The accepted string is stored exactly as submitted (after trimming
//! surrounding whitespace), so a resolved short ID returns byte-for-byte what
//! the client sent. Control characters are rejected rather than cleaned up,
//! since the stored string becomes a `Location` header verbatim.

use url::Url;

use crate::error::AppError;
use serde_json::json;

/// Longest original URL accepted.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons an original URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidUrl {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("URL must not contain control characters")]
    ControlCharacter,

    #[error("Invalid URL format: {0}")]
    Malformed(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URLs with embedded credentials are not allowed")]
    EmbeddedCredentials,
}

impl From<InvalidUrl> for AppError {
    fn from(e: InvalidUrl) -> Self {
        AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
    }
}

/// Checks that `input` is an absolute HTTP(S) URL and returns the string to store.
///
/// Rejects `javascript:`, `data:`, `file:` and every other non-HTTP scheme,
/// as well as `user:pass@host` forms.
///
/// # Errors
///
/// Returns the first [`InvalidUrl`] rule that fails.
pub fn validate_original_url(input: &str) -> Result<String, InvalidUrl> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(InvalidUrl::Empty);
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(InvalidUrl::TooLong);
    }

    // `Url::parse` strips tabs and newlines and escapes other controls.
    if trimmed.chars().any(char::is_control) {
        return Err(InvalidUrl::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| InvalidUrl::Malformed(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(InvalidUrl::UnsupportedProtocol);
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(InvalidUrl::MissingHost);
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(InvalidUrl::EmbeddedCredentials);
    }

    Ok(trimmed.to_string())
}
