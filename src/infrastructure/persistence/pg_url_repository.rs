//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::rows::UrlRow;
use crate::utils::db_error::is_short_id_collision;

/// PostgreSQL repository for URL records.
///
/// Every method is a single statement on a pooled connection; nothing holds a
/// connection or transaction across calls.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (short_id, original_url, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, short_id, original_url, user_id, created_at, last_accessed_at, visit_count
            "#,
        )
        .bind(&new_record.short_id)
        .bind(&new_record.original_url)
        .bind(&new_record.user_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_short_id_collision(&e) {
                AppError::conflict(
                    "Short ID already exists",
                    json!({ "short_id": new_record.short_id }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, short_id, original_url, user_id, created_at, last_accessed_at, visit_count
            FROM urls
            WHERE short_id = $1
            "#,
        )
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn increment_visit(&self, short_id: &str) -> Result<Option<UrlRecord>, AppError> {
        // Row-level lock taken by UPDATE serializes concurrent increments.
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            UPDATE urls
            SET visit_count = visit_count + 1,
                last_accessed_at = GREATEST(NOW(), created_at)
            WHERE short_id = $1
            RETURNING id, short_id, original_url, user_id, created_at, last_accessed_at, visit_count
            "#,
        )
        .bind(short_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn total_visits(&self) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(visit_count), 0)::BIGINT FROM urls")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(total)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
