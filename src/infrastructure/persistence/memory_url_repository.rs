//! In-memory implementation of the URL repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Process-local URL storage backed by [`DashMap`].
///
/// Insert uses the map's entry API and increments mutate the entry under its
/// shard lock, so both are atomic with respect to concurrent callers.
#[derive(Debug, Default)]
pub struct MemoryUrlRepository {
    records: DashMap<String, UrlRecord>,
    // id -> short_id
    ids: DashMap<i64, String>,
    next_id: AtomicI64,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a record with this primary key exists.
    pub fn contains_id(&self, id: i64) -> bool {
        self.ids.contains_key(&id)
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        match self.records.entry(new_record.short_id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Short ID already exists",
                json!({ "short_id": new_record.short_id }),
            )),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                let record = UrlRecord::new(
                    id,
                    new_record.short_id,
                    new_record.original_url,
                    new_record.user_id,
                    Utc::now(),
                );
                self.ids.insert(id, record.short_id.clone());
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.records.get(short_id).map(|entry| entry.value().clone()))
    }

    async fn increment_visit(&self, short_id: &str) -> Result<Option<UrlRecord>, AppError> {
        let Some(mut entry) = self.records.get_mut(short_id) else {
            return Ok(None);
        };

        let updated = entry.value().clone().with_visit(Utc::now());
        *entry.value_mut() = updated.clone();
        Ok(Some(updated))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.records.len() as i64)
    }

    async fn total_visits(&self) -> Result<i64, AppError> {
        Ok(self.records.iter().map(|entry| entry.value().visit_count).sum())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_record(short_id: &str, url: &str) -> NewUrlRecord {
        NewUrlRecord {
            short_id: short_id.to_string(),
            original_url: url.to_string(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = MemoryUrlRepository::new();

        let created = repo
            .insert(new_record("aB3xY9k", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let found = repo.find_by_short_id("aB3xY9k").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(repo.contains_id(1));
        assert!(!repo.contains_id(2));
    }

    #[tokio::test]
    async fn test_contains_id_ignores_rejected_inserts() {
        let repo = MemoryUrlRepository::new();
        repo.insert(new_record("taken12", "https://first.com"))
            .await
            .unwrap();
        repo.insert(new_record("taken12", "https://second.com"))
            .await
            .unwrap_err();

        assert!(repo.contains_id(1));
        assert!(!repo.contains_id(2));
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let repo = MemoryUrlRepository::new();
        repo.insert(new_record("abcdefg", "https://example.com"))
            .await
            .unwrap();

        assert!(repo.find_by_short_id("ABCDEFG").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_conflict_keeps_original() {
        let repo = MemoryUrlRepository::new();
        repo.insert(new_record("taken12", "https://first.com"))
            .await
            .unwrap();

        let err = repo
            .insert(new_record("taken12", "https://second.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let kept = repo.find_by_short_id("taken12").await.unwrap().unwrap();
        assert_eq!(kept.original_url, "https://first.com");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_increment_unknown_is_none() {
        let repo = MemoryUrlRepository::new();
        assert!(repo.increment_visit("missing").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let repo = Arc::new(MemoryUrlRepository::new());
        repo.insert(new_record("hotlink", "https://example.com"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..200 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.increment_visit("hotlink").await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = repo.find_by_short_id("hotlink").await.unwrap().unwrap();
        assert_eq!(record.visit_count, 200);
        assert!(record.last_accessed_at.unwrap() >= record.created_at);
        assert_eq!(repo.total_visits().await.unwrap(), 200);
    }
}
