//! Short ID resolution.

use std::sync::Arc;

use crate::application::services::VisitRecorder;
use crate::domain::entities::VisitMetadata;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::short_id::is_valid_short_id;
use serde_json::json;
use tracing::debug;

/// Translates short IDs into redirect targets and accounts for the visit.
///
/// The lookup and the counter bump are one atomic repository call, so the
/// count is exact under concurrent resolutions of the same ID. The raw visit
/// row is written afterwards by the background worker.
pub struct RedirectService {
    repository: Arc<dyn UrlRepository>,
    recorder: VisitRecorder,
}

impl RedirectService {
    pub fn new(repository: Arc<dyn UrlRepository>, recorder: VisitRecorder) -> Self {
        Self {
            repository,
            recorder,
        }
    }

    /// Resolves `short_id` to its original URL and records the visit.
    ///
    /// Matching is exact and case-sensitive. IDs containing characters outside
    /// the short ID alphabet are rejected without a storage round trip.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for unknown or malformed IDs; nothing is recorded
    /// - [`AppError::Persistence`] if the lookup itself fails
    pub async fn resolve(
        &self,
        short_id: &str,
        metadata: VisitMetadata,
    ) -> Result<String, AppError> {
        let record = if is_valid_short_id(short_id) {
            self.repository.increment_visit(short_id).await?
        } else {
            None
        };

        let Some(record) = record else {
            debug!(short_id, "Short ID not found");
            metrics::counter!("shortlink_redirects_total", "outcome" => "not_found").increment(1);
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "short_id": short_id }),
            ));
        };

        self.recorder.record(record.id, &record.short_id, metadata);
        metrics::counter!("shortlink_redirects_total", "outcome" => "found").increment(1);

        Ok(record.original_url)
    }

    pub fn recorder(&self) -> &VisitRecorder {
        &self.recorder
    }
}
