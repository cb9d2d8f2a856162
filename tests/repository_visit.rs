//! PostgreSQL visit repository tests. Run with `-- --ignored` and a database.

mod common;

use chrono::{Duration, Utc};
use shortlink::domain::entities::{NewVisit, VisitMetadata};
use shortlink::domain::repositories::VisitRepository;
use shortlink::error::AppError;
use shortlink::infrastructure::persistence::PgVisitRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_visit(url_id: i64, seconds_ago: i64) -> NewVisit {
    NewVisit {
        url_id,
        visited_at: Utc::now() - Duration::seconds(seconds_ago),
        metadata: VisitMetadata::new(
            Some("10.0.0.1".to_string()),
            Some("TestBot/1.0"),
            Some("https://google.com"),
        ),
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_record_and_list(pool: PgPool) {
    let url_id = common::create_pg_url(&pool, "Visit23", "https://example.com").await;
    let repo = PgVisitRepository::new(Arc::new(pool));

    let visit = repo.record(new_visit(url_id, 0)).await.unwrap();
    assert_eq!(visit.url_id, url_id);
    assert_eq!(visit.ip_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(visit.user_agent.as_deref(), Some("TestBot/1.0"));
    assert_eq!(visit.referrer.as_deref(), Some("https://google.com"));

    assert_eq!(repo.count_by_url_id(url_id).await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_record_for_unknown_url_is_rejected(pool: PgPool) {
    let repo = PgVisitRepository::new(Arc::new(pool));

    let err = repo.record(new_visit(999_999, 0)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_newest_first_with_paging(pool: PgPool) {
    let url_id = common::create_pg_url(&pool, "Visit23", "https://example.com").await;
    let repo = PgVisitRepository::new(Arc::new(pool));
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
