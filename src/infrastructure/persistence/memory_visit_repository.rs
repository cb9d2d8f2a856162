//! In-memory implementation of the visit repository.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::VisitRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::MemoryUrlRepository;

/// Process-local visit storage, keyed by owning record id.
///
/// Shares the URL store so visits for unknown records are rejected the same
/// way the foreign key rejects them in PostgreSQL.
#[derive(Debug)]
pub struct MemoryVisitRepository {
    urls: Arc<MemoryUrlRepository>,
    visits: DashMap<i64, Vec<Visit>>,
    next_id: AtomicI64,
}

impl MemoryVisitRepository {
    pub fn new(urls: Arc<MemoryUrlRepository>) -> Self {
        Self {
            urls,
            visits: DashMap::new(),
            next_id: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl VisitRepository for MemoryVisitRepository {
    async fn record(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        if !self.urls.contains_id(new_visit.url_id) {
            return Err(AppError::bad_request(
                "URL record does not exist",
                json!({ "url_id": new_visit.url_id }),
            ));
        }

        let visit = Visit {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            url_id: new_visit.url_id,
            visited_at: new_visit.visited_at,
            ip_address: new_visit.metadata.ip_address,
            user_agent: new_visit.metadata.user_agent,
            referrer: new_visit.metadata.referrer,
        };

        self.visits
            .entry(visit.url_id)
            .or_default()
            .push(visit.clone());

        Ok(visit)
    }

    async fn list_by_url_id(
        &self,
        url_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Visit>, AppError> {
        let Some(entry) = self.visits.get(&url_id) else {
            return Ok(Vec::new());
        };

        let mut visits = entry.value().clone();
        drop(entry);
        visits.sort_by(|a, b| b.visited_at.cmp(&a.visited_at).then(b.id.cmp(&a.id)));

        Ok(visits
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_by_url_id(&self, url_id: i64) -> Result<i64, AppError> {
        Ok(self
            .visits
            .get(&url_id)
            .map(|entry| entry.value().len() as i64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NewUrlRecord, VisitMetadata};
    use crate::domain::repositories::UrlRepository;
    use chrono::{Duration, Utc};

    async fn setup() -> (MemoryVisitRepository, i64) {
        let urls = Arc::new(MemoryUrlRepository::new());
        let record = urls
            .insert(NewUrlRecord {
                short_id: "aB3xY9k".to_string(),
                original_url: "https://example.com".to_string(),
                user_id: None,
            })
            .await
            .unwrap();
        (MemoryVisitRepository::new(urls), record.id)
    }

    fn new_visit(url_id: i64, seconds_ago: i64) -> NewVisit {
        NewVisit {
            url_id,
            visited_at: Utc::now() - Duration::seconds(seconds_ago),
            metadata: VisitMetadata::new(None, Some("TestBot/1.0"), None),
        }
    }

    #[tokio::test]
    async fn test_record_and_count() {
        let (repo, url_id) = setup().await;

        let visit = repo.record(new_visit(url_id, 0)).await.unwrap();
        assert_eq!(visit.url_id, url_id);
        assert_eq!(visit.user_agent.as_deref(), Some("TestBot/1.0"));
        assert_eq!(repo.count_by_url_id(url_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_rejects_unknown_url() {
        let (repo, _) = setup().await;

        let err = repo.record(new_visit(999, 0)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(repo.count_by_url_id(999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_paging() {
        let (repo, url_id) = setup().await;
        for seconds_ago in [30, 10, 20] {
            repo.record(new_visit(url_id, seconds_ago)).await.unwrap();
        }

        let page = repo.list_by_url_id(url_id, 0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(page[0].visited_at > page[1].visited_at);

        let rest = repo.list_by_url_id(url_id, 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert!(rest[0].visited_at < page[1].visited_at);
    }
}
