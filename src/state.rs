//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{RedirectService, UrlService, VisitRecorder, VisitService};
use crate::domain::repositories::{UrlRepository, VisitRepository};
use crate::domain::visit_event::VisitEvent;
use crate::utils::short_id::ShortIdGenerator;

/// Cloneable handle to the services; cloned per request by axum.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub redirect_service: Arc<RedirectService>,
    pub visit_service: Arc<VisitService>,
    /// Kept for the health check; the redirect path goes through `redirect_service`.
    pub visit_recorder: VisitRecorder,
    pub url_repository: Arc<dyn UrlRepository>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` when recording client IPs.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services over the given storage backend.
    ///
    /// `visit_sender` feeds the background visit worker; the state holds the
    /// only long-lived clones, so dropping every clone of the state closes the
    /// channel.
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        visit_repository: Arc<dyn VisitRepository>,
        generator: Arc<dyn ShortIdGenerator>,
        visit_sender: mpsc::Sender<VisitEvent>,
        base_url: &str,
        max_attempts: usize,
        behind_proxy: bool,
    ) -> Self {
        let visit_recorder = VisitRecorder::new(visit_sender);

        Self {
            url_service: Arc::new(UrlService::new(
                url_repository.clone(),
                generator,
                max_attempts,
                base_url,
            )),
            redirect_service: Arc::new(RedirectService::new(
                url_repository.clone(),
                visit_recorder.clone(),
            )),
            visit_service: Arc::new(VisitService::new(url_repository.clone(), visit_repository)),
            visit_recorder,
            url_repository,
            behind_proxy,
        }
    }
}
