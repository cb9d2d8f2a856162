//! Repository trait for URL records.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for short ID records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - in-process
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new record in a single statement.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `short_id` is already taken. The
    /// existing record is left untouched.
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Finds a record by its exact (case-sensitive) short ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Atomically bumps `visit_count` and `last_accessed_at`.
    ///
    /// Concurrent calls for the same short ID never lose an increment.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` with the post-increment state
    /// - `Ok(None)` if the short ID is unknown (nothing is modified)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn increment_visit(&self, short_id: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Counts all stored records.
    async fn count(&self) -> Result<i64, AppError>;

    /// Sums `visit_count` over all records.
    async fn total_visits(&self) -> Result<i64, AppError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
