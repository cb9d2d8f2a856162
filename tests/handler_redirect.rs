mod common;

use shortlink::domain::repositories::UrlRepository;

#[tokio::test]
async fn test_redirect_success() {
    let (state, _rx, storage) = common::create_test_state();
    common::create_test_url(&storage, "Redir23", "https://example.com/target").await;
    let server = common::test_server(state);

    let response = server.get("/Redir23").await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/target");

    let record = storage.urls.find_by_short_id("Redir23").await.unwrap().unwrap();
    assert_eq!(record.visit_count, 1);
    assert!(record.last_accessed_at.is_some());
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (state, mut rx, storage) = common::create_test_state();
    common::create_test_url(&storage, "Kept234", "https://example.com").await;
    let server = common::test_server(state);

    // Well-formed, so the lookup reaches the store.
    let response = server.get("/Unknwn2").await;

    response.assert_status_not_found();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "not_found");
    assert!(rx.try_recv().is_err());
    assert_eq!(storage.urls.total_visits().await.unwrap(), 0);
}

#[tokio::test]
async fn test_redirect_malformed_id_not_found() {
    let (state, mut rx, _storage) = common::create_test_state();
    let server = common::test_server(state);

    let response = server.get("/doesnotexist").await;

    response.assert_status_not_found();
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_is_case_sensitive() {
    let (state, _rx, storage) = common::create_test_state();
    common::create_test_url(&storage, "abcdefg", "https://example.com").await;
    let server = common::test_server(state);

    server.get("/ABCDEFG").await.assert_status_not_found();

    let record = storage.urls.find_by_short_id("abcdefg").await.unwrap().unwrap();
    assert_eq!(record.visit_count, 0);
}

#[tokio::test]
async fn test_redirect_records_visit() {
    let (state, mut rx, storage) = common::create_test_state();
    let url_id = common::create_test_url(&storage, "Track23", "https://example.com").await;
    let server = common::test_server(state);

    let response = server
        .get("/Track23")
        .add_header("User-Agent", "Mozilla/5.0")
        .add_header("Referer", "https://google.com")
        .await;

    assert_eq!(response.status_code(), 302);

    let event = rx.try_recv().unwrap();
    assert_eq!(event.url_id, url_id);
    assert_eq!(event.short_id, "Track23");
    assert_eq!(event.metadata.ip_address.as_deref(), Some("127.0.0.1"));
    assert_eq!(event.metadata.user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(event.metadata.referrer.as_deref(), Some("https://google.com"));
}

#[tokio::test]
async fn test_redirect_ignores_forwarded_for_without_proxy() {
    let (state, mut rx, storage) = common::create_test_state();
    common::create_test_url(&storage, "Prxy234", "https://example.com").await;
    let server = common::test_server(state);

    server
        .get("/Prxy234")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;

    let event = rx.try_recv().unwrap();
    assert_eq!(event.metadata.ip_address.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_redirect_survives_closed_visit_queue() {
    let (state, rx, storage) = common::create_test_state();
    drop(rx);
    common::create_test_url(&storage, "Shut234", "https://example.com").await;
    let server = common::test_server(state);

    let response = server.get("/Shut234").await;

    assert_eq!(response.status_code(), 302);
    let record = storage.urls.find_by_short_id("Shut234").await.unwrap().unwrap();
    assert_eq!(record.visit_count, 1);
}
