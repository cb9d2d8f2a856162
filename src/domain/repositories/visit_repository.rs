//! Repository trait for raw visit rows.

use crate::domain::entities::{NewVisit, Visit};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for visit rows.
///
/// Rows are append-only; analytics consumers read them through
/// [`VisitRepository::list_by_url_id`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Appends a visit row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the referenced record does not exist.
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn record(&self, new_visit: NewVisit) -> Result<Visit, AppError>;

    /// Lists visits for a record, newest first.
    async fn list_by_url_id(
        &self,
        url_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Visit>, AppError>;

    /// Counts visits stored for a record.
    async fn count_by_url_id(&self, url_id: i64) -> Result<i64, AppError>;
}
