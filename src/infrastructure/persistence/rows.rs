//! Row structs for the `urls` and `visits` tables and their entity mappings.
//!
//! The `RETURNING`/`SELECT` column lists in the repositories must match these
//! structs field for field.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::entities::{UrlRecord, Visit};

/// One row of `urls`.
#[derive(Debug, FromRow)]
pub struct UrlRow {
    pub id: i64,
    pub short_id: String,
    pub original_url: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub visit_count: i64,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord {
            id: row.id,
            short_id: row.short_id,
            original_url: row.original_url,
            user_id: row.user_id,
            created_at: row.created_at,
            last_accessed_at: row.last_accessed_at,
            visit_count: row.visit_count,
        }
    }
}

/// One row of `visits`.
#[derive(Debug, FromRow)]
pub struct VisitRow {
    pub id: i64,
    pub url_id: i64,
    pub visited_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl From<VisitRow> for Visit {
    fn from(row: VisitRow) -> Self {
        Visit {
            id: row.id,
            url_id: row.url_id,
            visited_at: row.visited_at,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            referrer: row.referrer,
        }
    }
}
