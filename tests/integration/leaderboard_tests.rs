use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use kol_board::config::Config;
use kol_board::server::router;
use kol_board::{LeaderboardEntry, LeaderboardService};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("fixtures/leaderboard.html");

/// Creates a test configuration pointing at the mock upstream
fn create_test_config(mock_server: &MockServer) -> Config {
    let mut config = Config::default();
    config.upstream.url = format!("{}/leaderboard", mock_server.uri());
    config.upstream.timeout_secs = 2;
    config.upstream.connect_timeout_secs = 1;
    config
}

fn create_app(config: &Config) -> (Arc<LeaderboardService>, Router) {
    let service = Arc::new(LeaderboardService::from_config(config).expect("Failed to build service"));
    let app = router(service.clone());
    (service, app)
}

async fn mount_fixture(mock_server: &MockServer, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path("/leaderboard"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FIXTURE)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(expected_hits)
        .mount(mock_server)
        .await;
}

fn get(uri: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(addr) = forwarded_for {
        builder = builder.header("x-forwarded-for", addr);
    }
    builder.body(Body::empty()).expect("Failed to build request")
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

async fn get_entries(app: &Router, forwarded_for: Option<&str>) -> (String, Vec<LeaderboardEntry>) {
    let response = app
        .clone()
        .oneshot(get("/leaderboard", forwarded_for))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let cache_status = response
        .headers()
        .get("x-cache-status")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let entries = serde_json::from_str(&body_string(response).await).expect("Invalid JSON body");
    (cache_status, entries)
}

#[tokio::test]
async fn test_fixture_end_to_end_with_cache() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 1).await;

    let config = create_test_config(&mock_server);
    let (_service, app) = create_app(&config);

    let (status, entries) = get_entries(&app, None).await;
    assert_eq!(status, "MISS");

    // The nameless container is dropped; order follows the page
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Cented", "Cupsey", "Jijo"]);

    let cented = &entries[0];
    assert_eq!(cented.address, "CyaE1VxvBrahnPWkqm5VsdCvyS2QmNht2UFrKJHga54o");
    assert_eq!(cented.realized_pnl, "+112.44");
    assert_eq!(cented.realized_pnl_usd, "16,342.8");
    assert_eq!(
        cented.pfp_url.as_deref(),
        Some(format!("{}/pfps/cented.png", mock_server.uri()).as_str())
    );
    assert_eq!(cented.twitter_url.as_deref(), Some("https://x.com/Cented7"));

    let cupsey = &entries[1];
    assert_eq!(
        cupsey.pfp_url.as_deref(),
        Some("https://cdn.kolscan.io/profiles/2fg5QD1e.png")
    );
    assert_eq!(
        cupsey.twitter_url.as_deref(),
        Some("https://kolscan.io/out/cupsey")
    );

    let jijo = &entries[2];
    assert_eq!(jijo.realized_pnl, "-3.25");
    assert_eq!(jijo.realized_pnl_usd, "-472.4");
    assert_eq!(jijo.twitter_url, None);

    // Within the freshness window: same entries, no second upstream hit
    let (status, again) = get_entries(&app, None).await;
    assert_eq!(status, "HIT");
    assert_eq!(again, entries);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_json_field_names() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 1).await;

    let config = create_test_config(&mock_server);
    let (_service, app) = create_app(&config);

    let response = app
        .clone()
        .oneshot(get("/api/leaderboard", None))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    let first = json[0].as_object().unwrap();
    for field in [
        "name",
        "address",
        "realizedPnl",
        "realizedPnlUsd",
        "pfpUrl",
        "twitterUrl",
    ] {
        assert!(first.contains_key(field), "missing field {}", field);
    }

    // Optional fields are omitted rather than null
    let third = json[2].as_object().unwrap();
    assert!(!third.contains_key("twitterUrl"));
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 1).await;

    let config = create_test_config(&mock_server);
    let (_service, app) = create_app(&config);

    for _ in 0..10 {
        get_entries(&app, Some("198.51.100.4")).await;
    }

    let response = app
        .clone()
        .oneshot(get("/leaderboard", Some("198.51.100.4")))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1 && retry_after <= 60);
    assert_eq!(body_string(response).await, "Too many requests");

    // Other clients keep their own window
    let (status, entries) = get_entries(&app, Some("198.51.100.5")).await;
    assert_eq!(status, "HIT");
    assert_eq!(entries.len(), 3);

    mock_server.verify().await;
}

#[tokio::test]
async fn test_requests_without_forwarded_header_share_loopback_key() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 1).await;

    let mut config = create_test_config(&mock_server);
    config.rate_limit.max_requests = 2;
    let (service, app) = create_app(&config);

    get_entries(&app, None).await;
    get_entries(&app, None).await;

    let response = app
        .clone()
        .oneshot(get("/leaderboard", None))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(service.limiter().record("127.0.0.1").unwrap().count, 2);
}

#[tokio::test]
async fn test_upstream_failure_returns_empty_array() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leaderboard"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let (service, app) = create_app(&config);

    let (_, entries) = get_entries(&app, None).await;
    assert!(entries.is_empty());
    assert!(service.cache().get().await.is_none());
}

#[tokio::test]
async fn test_upstream_timeout_returns_empty_array() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leaderboard"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FIXTURE)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let (_service, app) = create_app(&config);

    let (_, entries) = get_entries(&app, None).await;
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_stale_entries_survive_failed_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/leaderboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/leaderboard"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let (service, app) = create_app(&config);

    let (_, original) = get_entries(&app, None).await;
    assert_eq!(original.len(), 3);

    // Push the slot past the freshness window
    let slot = service.cache().get().await.unwrap();
    service
        .cache()
        .put_at(slot.entries, Utc::now() - chrono::Duration::minutes(5))
        .await;

    let (status, entries) = get_entries(&app, None).await;
    assert_eq!(status, "STALE");
    assert_eq!(entries, original);
}

#[tokio::test]
async fn test_stale_entries_survive_layout_change() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/leaderboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/leaderboard"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><div class="ranking_row__Q1">Cented</div></body></html>"#),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let (service, app) = create_app(&config);

    let (_, original) = get_entries(&app, None).await;

    let slot = service.cache().get().await.unwrap();
    service
        .cache()
        .put_at(slot.entries, Utc::now() - chrono::Duration::minutes(7))
        .await;

    let (status, entries) = get_entries(&app, None).await;
    assert_eq!(status, "STALE");
    assert_eq!(entries, original);
}

#[tokio::test]
async fn test_concurrent_misses_fetch_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leaderboard"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FIXTURE)
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let (_service, app) = create_app(&config);

    let mut handles = vec![];
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let forwarded = format!("192.0.2.{}", i);
            get_entries(&app, Some(forwarded.as_str())).await.1
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().len(), 3);
    }

    mock_server.verify().await;
}

#[tokio::test]
async fn test_health() {
    let config = Config::default();
    let (_service, app) = create_app(&config);

    let response = app.oneshot(get("/health", None)).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}
