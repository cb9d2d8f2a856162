//! PostgreSQL implementation of the visit repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::VisitRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::rows::VisitRow;
use crate::utils::db_error::is_missing_parent;

/// PostgreSQL repository for raw visit rows.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn record(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let url_id = new_visit.url_id;

        let row = sqlx::query_as::<_, VisitRow>(
            r#"
            INSERT INTO visits (url_id, visited_at, ip_address, user_agent, referrer)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, url_id, visited_at, ip_address, user_agent, referrer
            "#,
        )
        .bind(new_visit.url_id)
        .bind(new_visit.visited_at)
        .bind(new_visit.metadata.ip_address)
        .bind(new_visit.metadata.user_agent)
        .bind(new_visit.metadata.referrer)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_missing_parent(&e) {
                AppError::bad_request("URL record does not exist", json!({ "url_id": url_id }))
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn list_by_url_id(
        &self,
        url_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Visit>, AppError> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, url_id, visited_at, ip_address, user_agent, referrer
            FROM visits
            WHERE url_id = $1
            ORDER BY visited_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(url_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Visit::from).collect())
    }

    async fn count_by_url_id(&self, url_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits WHERE url_id = $1")
            .bind(url_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
