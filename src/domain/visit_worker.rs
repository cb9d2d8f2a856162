//! Background worker that persists visit events.
//!
//! The redirect path never waits on this worker. Events arrive on a bounded
//! channel, are written with bounded concurrency, and transient storage errors
//! are retried with jittered exponential backoff. When the channel closes the
//! worker finishes every in-flight write before returning, which is what
//! graceful shutdown waits on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::repositories::VisitRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;

/// Retries after the first failed attempt.
const MAX_RETRIES: usize = 3;

/// Runs until the sending side of `rx` is closed and all writes are done.
pub async fn run_visit_worker(
    mut rx: mpsc::Receiver<VisitEvent>,
    visit_repository: Arc<dyn VisitRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let repository = visit_repository.clone();

        tokio::spawn(async move {
            let _permit = permit;
            persist_visit(repository.as_ref(), event).await;
        });
    }

    // Every permit back means every spawned write has finished.
    let _ = semaphore.acquire_many(concurrency as u32).await;
    info!("Visit worker stopped");
}

/// Writes one visit, retrying transient failures.
///
/// Returns `true` if the row was stored. Failures are logged and counted,
/// never propagated.
pub async fn persist_visit(repository: &dyn VisitRepository, event: VisitEvent) -> bool {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::spawn(
        strategy,
        || repository.record(event.to_new_visit()),
        |e: &AppError| matches!(e, AppError::Persistence { .. }),
    )
    .await;

    match result {
        Ok(visit) => {
            debug!(visit_id = visit.id, short_id = %event.short_id, "Visit recorded");
            metrics::counter!("shortlink_visits_recorded_total").increment(1);
            true
        }
        Err(e) => {
            warn!(
                short_id = %event.short_id,
                url_id = event.url_id,
                error = %e,
                "Failed to record visit"
            );
            metrics::counter!("shortlink_visits_failed_total").increment(1);
            false
        }
    }
}
