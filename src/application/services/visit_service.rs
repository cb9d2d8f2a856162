//! Read access to recorded visits.

use std::sync::Arc;

use crate::domain::entities::{UrlRecord, Visit};
use crate::domain::repositories::{UrlRepository, VisitRepository};
use crate::error::AppError;
use crate::utils::short_id::is_valid_short_id;
use serde_json::json;

/// One page of visits for a record.
#[derive(Debug, Clone)]
pub struct VisitPage {
    pub record: UrlRecord,
    /// Stored visit rows for the record, across all pages.
    pub total: i64,
    pub items: Vec<Visit>,
}

/// Service for browsing the visit history of a short link.
pub struct VisitService {
    url_repository: Arc<dyn UrlRepository>,
    visit_repository: Arc<dyn VisitRepository>,
}

impl VisitService {
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        visit_repository: Arc<dyn VisitRepository>,
    ) -> Self {
        Self {
            url_repository,
            visit_repository,
        }
    }

    /// Returns visits for `short_id`, newest first.
    ///
    /// `total` counts stored rows and can trail the record's `visit_count`
    /// while the worker catches up, or permanently if visits were dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the short ID is unknown.
    pub async fn list_visits(
        &self,
        short_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<VisitPage, AppError> {
        let not_found =
            || AppError::not_found("Short link not found", json!({ "short_id": short_id }));

        if !is_valid_short_id(short_id) {
            return Err(not_found());
        }

        let record = self
            .url_repository
            .find_by_short_id(short_id)
            .await?
            .ok_or_else(not_found)?;

        let total = self.visit_repository.count_by_url_id(record.id).await?;
        let items = self
            .visit_repository
            .list_by_url_id(record.id, offset, limit)
            .await?;

        Ok(VisitPage {
            record,
            total,
            items,
        })
    }
}
