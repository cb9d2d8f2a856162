//! Short link creation and lookup service.

use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::short_id::{ShortIdGenerator, is_valid_short_id};
use crate::utils::url_validation::validate_original_url;
use serde_json::json;
use tracing::{debug, info, warn};

/// Creates short IDs for original URLs and looks records up.
///
/// Creation is a bounded retry loop: each attempt draws a fresh candidate and
/// tries one `insert`. A unique-constraint conflict moves on to the next
/// attempt; any other error ends the loop. No attempt holds a connection or
/// transaction open for the next one.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    generator: Arc<dyn ShortIdGenerator>,
    max_attempts: usize,
    base_url: String,
}

impl UrlService {
    /// Creates a new URL service.
    ///
    /// `base_url` is the public prefix short URLs are built from, for example
    /// `https://sho.rt`.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        generator: Arc<dyn ShortIdGenerator>,
        max_attempts: usize,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            generator,
            max_attempts: max_attempts.max(1),
            base_url: base_url.into(),
        }
    }

    /// Validates `original_url` and stores it under a fresh short ID.
    ///
    /// Each call creates a new record, even for a URL that was shortened
    /// before.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is rejected (no ID is generated)
    /// - [`AppError::Exhausted`] if every attempt collided
    /// - [`AppError::Persistence`] on storage errors
    pub async fn create(
        &self,
        original_url: &str,
        user_id: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        let original_url = validate_original_url(original_url)?;

        for attempt in 1..=self.max_attempts {
            let short_id = self.generator.generate(&original_url)?;

            let new_record = NewUrlRecord {
                short_id,
                original_url: original_url.clone(),
                user_id: user_id.clone(),
            };

            match self.repository.insert(new_record).await {
                Ok(record) => {
                    info!(short_id = %record.short_id, attempt, "Short URL created");
                    metrics::counter!("shortlink_urls_created_total").increment(1);
                    return Ok(record);
                }
                Err(AppError::Conflict { details, .. }) => {
                    debug!(attempt, ?details, "Short ID collision, retrying");
                    metrics::counter!("shortlink_short_id_collisions_total").increment(1);
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "Gave up generating a unique short ID"
        );
        Err(AppError::exhausted(
            "Failed to generate a unique short ID",
            json!({ "attempts": self.max_attempts }),
        ))
    }

    /// Retrieves a record by its exact short ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches.
    pub async fn find_by_short_id(&self, short_id: &str) -> Result<UrlRecord, AppError> {
        let not_found =
            || AppError::not_found("Short link not found", json!({ "short_id": short_id }));

        if !is_valid_short_id(short_id) {
            return Err(not_found());
        }

        self.repository
            .find_by_short_id(short_id)
            .await?
            .ok_or_else(not_found)
    }

    /// Builds the public short URL for a short ID.
    pub fn short_url(&self, short_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), short_id)
    }
}
