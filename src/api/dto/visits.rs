//! DTOs for the visit history endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Visit;

/// A single recorded visit.
///
/// Optional fields are omitted from JSON when `None`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitInfo {
    pub visited_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

impl From<Visit> for VisitInfo {
    fn from(visit: Visit) -> Self {
        Self {
            visited_at: visit.visited_at,
            ip_address: visit.ip_address,
            user_agent: visit.user_agent,
            referrer: visit.referrer,
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = (total_items as f64 / page_size as f64).ceil() as u32;
        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

/// Response of `GET /urls/{shortId}/visits`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitsResponse {
    pub pagination: PaginationMeta,
    pub short_id: String,
    pub visit_count: i64,
    pub items: Vec<VisitInfo>,
}
