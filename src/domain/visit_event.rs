//! Visit event model for asynchronous visit recording.

use chrono::{DateTime, Utc};

use crate::domain::entities::{NewVisit, VisitMetadata};

/// An in-memory visit handed from the redirect path to the background worker.
///
/// Carries the already-resolved record id so the worker never repeats the
/// short ID lookup. `visited_at` is captured at resolution time, not at
/// persistence time.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub url_id: i64,
    pub short_id: String,
    pub visited_at: DateTime<Utc>,
    pub metadata: VisitMetadata,
}

impl VisitEvent {
    /// Creates an event stamped with the current time.
    pub fn new(url_id: i64, short_id: String, metadata: VisitMetadata) -> Self {
        Self {
            url_id,
            short_id,
            visited_at: Utc::now(),
            metadata,
        }
    }

    /// Builds the repository input for this event.
    pub fn to_new_visit(&self) -> NewVisit {
        NewVisit {
            url_id: self.url_id,
            visited_at: self.visited_at,
            metadata: self.metadata.clone(),
        }
    }
}
