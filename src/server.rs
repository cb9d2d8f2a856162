//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, worker spawning, the Axum server lifecycle and
//! graceful shutdown.

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{UrlRepository, VisitRepository};
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::persistence::{
    MemoryUrlRepository, MemoryVisitRepository, PgUrlRepository, PgVisitRepository,
};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::short_id::RandomShortIdGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Creates the PostgreSQL pool with the configured limits.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL pool + migrations, or in-memory)
/// - Background visit worker
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections and finishes
/// in-flight requests, then the visit channel is closed, the worker drains
/// and the pool is closed.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_pool(&config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");

            Some(pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on exit");
            None
        }
    };

    let (url_repository, visit_repository) = repositories(pool.as_ref());

    let (visit_tx, visit_rx) = mpsc::channel(config.visit_queue_capacity);

    let worker = tokio::spawn(run_visit_worker(
        visit_rx,
        visit_repository.clone(),
        config.visit_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.visit_worker_concurrency,
        "Visit worker started"
    );

    let state = AppState::new(
        url_repository,
        visit_repository,
        Arc::new(RandomShortIdGenerator::new(config.short_id_length)),
        visit_tx,
        &config.base_url,
        config.short_id_max_attempts,
        config.behind_proxy,
    );

    let app = app_router(state)?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and every sender clone inside it) is gone once serve returns,
    // so the worker sees a closed channel and drains.
    tracing::info!("Server stopped, draining visit queue");
    if let Err(e) = worker.await {
        tracing::error!("Visit worker panicked: {e}");
    }

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    Ok(())
}

fn repositories(pool: Option<&PgPool>) -> (Arc<dyn UrlRepository>, Arc<dyn VisitRepository>) {
    match pool {
        Some(pool) => {
            let pool = Arc::new(pool.clone());
            let urls: Arc<dyn UrlRepository> = Arc::new(PgUrlRepository::new(pool.clone()));
            let visits: Arc<dyn VisitRepository> = Arc::new(PgVisitRepository::new(pool));
            (urls, visits)
        }
        None => {
            let urls = Arc::new(MemoryUrlRepository::new());
            let visits: Arc<dyn VisitRepository> =
                Arc::new(MemoryVisitRepository::new(urls.clone()));
            let urls: Arc<dyn UrlRepository> = urls;
            (urls, visits)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
