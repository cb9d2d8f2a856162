//! URL record entity: the mapping from a short ID to its original URL.

use chrono::{DateTime, Utc};

/// A stored short link with its visit counters.
///
/// `short_id` and `original_url` never change after creation. `visit_count`
/// only grows, and `last_accessed_at` is never earlier than `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub id: i64,
    pub short_id: String,
    pub original_url: String,
    /// Owner identity supplied by the authentication gateway, if any.
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub visit_count: i64,
}

impl UrlRecord {
    /// Creates a record that has never been visited.
    pub fn new(
        id: i64,
        short_id: String,
        original_url: String,
        user_id: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_id,
            original_url,
            user_id,
            created_at,
            last_accessed_at: None,
            visit_count: 0,
        }
    }

    /// Returns a copy with one more visit at `at`.
    ///
    /// The access time is clamped so it never precedes `created_at`.
    pub fn with_visit(mut self, at: DateTime<Utc>) -> Self {
        self.visit_count += 1;
        self.last_accessed_at = Some(at.max(self.created_at));
        self
    }
}

/// Input data for inserting a new record.
#[derive(Debug, Clone)]
pub struct NewUrlRecord {
    pub short_id: String,
    pub original_url: String,
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record() -> UrlRecord {
        UrlRecord::new(
            1,
            "aB3xY9k".to_string(),
            "https://example.com/".to_string(),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_record_is_unvisited() {
        let record = record();
        assert_eq!(record.visit_count, 0);
        assert!(record.last_accessed_at.is_none());
        assert!(record.user_id.is_none());
    }

    #[test]
    fn test_with_visit_increments() {
        let now = Utc::now();
        let record = record().with_visit(now).with_visit(now);
        assert_eq!(record.visit_count, 2);
        assert!(record.last_accessed_at.is_some());
    }

    #[test]
    fn test_with_visit_clamps_to_created_at() {
        let record = record();
        let created_at = record.created_at;
        let visited = record.with_visit(created_at - Duration::seconds(30));
        assert_eq!(visited.last_accessed_at, Some(created_at));
    }
}
