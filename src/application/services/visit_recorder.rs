//! Non-blocking hand-off of visits to the background worker.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::domain::entities::VisitMetadata;
use crate::domain::visit_event::VisitEvent;

/// What happened to a visit handed to the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Queued for the worker.
    Queued,
    /// Queue full or worker gone; the visit row will not be written.
    Dropped,
}

/// Sending side of the visit pipeline.
///
/// Never waits: the redirect response is not delayed by analytics writes. The
/// record's visit counter is incremented before this is called, so a dropped
/// event only loses the raw row, never the count.
#[derive(Debug, Clone)]
pub struct VisitRecorder {
    sender: mpsc::Sender<VisitEvent>,
}

impl VisitRecorder {
    pub fn new(sender: mpsc::Sender<VisitEvent>) -> Self {
        Self { sender }
    }

    /// Enqueues a visit for record `url_id`.
    pub fn record(&self, url_id: i64, short_id: &str, metadata: VisitMetadata) -> RecordOutcome {
        let event = VisitEvent::new(url_id, short_id.to_string(), metadata);

        match self.sender.try_send(event) {
            Ok(()) => RecordOutcome::Queued,
            Err(TrySendError::Full(event)) => {
                warn!(short_id = %event.short_id, "Visit queue full, dropping visit");
                metrics::counter!("shortlink_visits_dropped_total", "reason" => "full")
                    .increment(1);
                RecordOutcome::Dropped
            }
            Err(TrySendError::Closed(event)) => {
                warn!(short_id = %event.short_id, "Visit queue closed, dropping visit");
                metrics::counter!("shortlink_visits_dropped_total", "reason" => "closed")
                    .increment(1);
                RecordOutcome::Dropped
            }
        }
    }

    /// Returns true once the worker has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots in the queue.
    pub fn available_capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}
