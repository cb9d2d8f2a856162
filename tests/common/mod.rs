#![allow(dead_code)]

use axum::extract::ConnectInfo;
use shortlink::AppState;
use shortlink::domain::visit_event::VisitEvent;
use shortlink::error::AppError;
use shortlink::infrastructure::persistence::{MemoryUrlRepository, MemoryVisitRepository};
use shortlink::utils::short_id::{RandomShortIdGenerator, ShortIdGenerator};
use sqlx::PgPool;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "https://sho.rt";

/// In-memory storage shared between the state and the assertions.
pub struct TestStorage {
    pub urls: Arc<MemoryUrlRepository>,
    pub visits: Arc<MemoryVisitRepository>,
}

impl TestStorage {
    pub fn new() -> Self {
        let urls = Arc::new(MemoryUrlRepository::new());
        let visits = Arc::new(MemoryVisitRepository::new(urls.clone()));
        Self { urls, visits }
    }
}

/// State over fresh in-memory storage; visit events land in the returned receiver.
pub fn create_test_state() -> (AppState, mpsc::Receiver<VisitEvent>, TestStorage) {
    create_test_state_with_generator(Arc::new(RandomShortIdGenerator::default()))
}

pub fn create_test_state_with_generator(
    generator: Arc<dyn ShortIdGenerator>,
) -> (AppState, mpsc::Receiver<VisitEvent>, TestStorage) {
    let storage = TestStorage::new();
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        storage.urls.clone(),
        storage.visits.clone(),
        generator,
        tx,
        BASE_URL,
        5,
        false,
    );

    (state, rx, storage)
}

/// Inserts a record directly into storage.
pub async fn create_test_url(storage: &TestStorage, short_id: &str, url: &str) -> i64 {
    use shortlink::domain::entities::NewUrlRecord;
    use shortlink::domain::repositories::UrlRepository;

    storage
        .urls
        .insert(NewUrlRecord {
            short_id: short_id.to_string(),
            original_url: url.to_string(),
            user_id: None,
        })
        .await
        .unwrap()
        .id
}

pub async fn create_pg_url(pool: &PgPool, short_id: &str, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO urls (short_id, original_url) VALUES ($1, $2) RETURNING id")
        .bind(short_id)
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Hands out a fixed sequence of candidates, then random ones.
pub struct ScriptedGenerator {
    scripted: Mutex<VecDeque<String>>,
    fallback: RandomShortIdGenerator,
}

impl ScriptedGenerator {
    pub fn new(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            scripted: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
            fallback: RandomShortIdGenerator::default(),
        })
    }
}

impl ShortIdGenerator for ScriptedGenerator {
    fn generate(&self, original_url: &str) -> Result<String, AppError> {
        match self.scripted.lock().unwrap().pop_front() {
            Some(id) => Ok(id),
            None => self.fallback.generate(original_url),
        }
    }
}

/// Inserts a fixed peer address, standing in for
/// `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Full router over the given state with a fake peer address.
pub fn test_server(state: AppState) -> axum_test::TestServer {
    let app = shortlink::routes::api_router(state).layer(MockConnectInfoLayer);
    axum_test::TestServer::new(app).unwrap()
}
