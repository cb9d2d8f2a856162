//! Visit entity representing a single resolution of a short ID.

use chrono::{DateTime, Utc};

/// Request metadata captured when a short ID is resolved.
///
/// Every field is best-effort; missing headers or peer address never block
/// recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl VisitMetadata {
    pub fn new(
        ip_address: Option<String>,
        user_agent: Option<&str>,
        referrer: Option<&str>,
    ) -> Self {
        Self {
            ip_address,
            user_agent: user_agent.map(|s| s.to_string()),
            referrer: referrer.map(|s| s.to_string()),
        }
    }
}

/// A persisted visit. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub id: i64,
    pub url_id: i64,
    pub visited_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// Input data for recording a visit.
///
/// `url_id` must reference an existing [`super::UrlRecord`].
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub url_id: i64,
    pub visited_at: DateTime<Utc>,
    pub metadata: VisitMetadata,
}
