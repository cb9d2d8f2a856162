//! DTOs for short link creation and lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlRecord;

/// Body of `POST /urls`.
///
/// Only structural checks happen here; the scheme, host and credential rules
/// live in [`crate::utils::url_validation`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    #[validate(length(min = 1, max = 2048, message = "originalUrl must be 1-2048 characters"))]
    pub original_url: String,
}

/// Response of `POST /urls`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlResponse {
    pub short_url: String,
    pub original_url: String,
    pub short_id: String,
}

/// Record metadata returned by `GET /urls/{shortId}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlInfoResponse {
    pub short_id: String,
    pub short_url: String,
    pub original_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub visit_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl UrlInfoResponse {
    pub fn from_record(record: UrlRecord, short_url: String) -> Self {
        Self {
            short_id: record.short_id,
            short_url,
            original_url: record.original_url,
            user_id: record.user_id,
            visit_count: record.visit_count,
            created_at: record.created_at,
            last_accessed_at: record.last_accessed_at,
        }
    }
}
