use crate::support::{html, test_config};
use std::sync::{Arc, Mutex};
use webcrawler::crawler::{FetchError, Fetcher, HelperListHook};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_parses_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html><head><title>Home</title></head><body>hi</body></html>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    let fetcher = Fetcher::new(&test_config(&url, 2)).unwrap();
    let fetched = fetcher.fetch(&url).await.unwrap();

    assert_eq!(fetched.status, 200);
    assert!(fetched.content_type.starts_with("text/html"));
    assert!(!fetched.raw.is_empty());
    assert!(fetched.document.walk().any(|n| n.tag() == Some("title")));
}

#[tokio::test]
async fn test_fetch_rejects_disallowed_mime() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logo"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/logo", mock_server.uri());
    let fetcher = Fetcher::new(&test_config(&url, 2)).unwrap();

    match fetcher.fetch(&url).await {
        Err(FetchError::MimeNotAllowed { content_type, .. }) => {
            assert_eq!(content_type, "image/png")
        }
        other => panic!("expected MimeNotAllowed, got {:?}", other.map(|f| f.status)),
    }
}

#[tokio::test]
async fn test_fetch_non_2xx_is_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing", mock_server.uri());
    let fetcher = Fetcher::new(&test_config(&url, 2)).unwrap();

    assert!(matches!(
        fetcher.fetch(&url).await,
        Err(FetchError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_fetch_enforces_body_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(html(&format!("<p>{}</p>", "word ".repeat(1_000))))
        .mount(&mock_server)
        .await;

    let url = format!("{}/big", mock_server.uri());
    let mut config = test_config(&url, 2);
    config.fetch.max_body_bytes = 256;
    let fetcher = Fetcher::new(&config).unwrap();

    assert!(matches!(
        fetcher.fetch(&url).await,
        Err(FetchError::BodyTooLarge { limit: 256, .. })
    ));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_request_error() {
    // Nothing listens on port 1
    let url = "http://127.0.0.1:1/".to_string();

    let fetcher = Fetcher::new(&test_config(&url, 2)).unwrap();
    assert!(matches!(
        fetcher.fetch(&url).await,
        Err(FetchError::Request { .. })
    ));
}

#[derive(Default)]
struct RecordingHook {
    urls: Mutex<Vec<String>>,
}

impl HelperListHook for RecordingHook {
    fn record_helper(&self, url: &str) {
        self.urls.lock().unwrap().push(url.to_string());
    }
}

#[tokio::test]
async fn test_overlay_conflict_calls_helper_hook() {
    // The mock server stands in for the overlay router's HTTP proxy
    let router = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&router)
        .await;

    let mut config = test_config("http://stats.i2p/", 2);
    config.overlay.enabled = true;
    config.overlay.address = router.uri();
    config.overlay.timeout_secs = 5;

    let hook = Arc::new(RecordingHook::default());
    let fetcher = Fetcher::new(&config).unwrap().with_helper_hook(hook.clone());

    assert!(matches!(
        fetcher.fetch("http://stats.i2p/").await,
        Err(FetchError::Status { status: 409, .. })
    ));
    assert_eq!(*hook.urls.lock().unwrap(), vec!["http://stats.i2p/".to_string()]);
}

#[tokio::test]
async fn test_conflict_on_regular_host_skips_helper_hook() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    let hook = Arc::new(RecordingHook::default());
    let fetcher = Fetcher::new(&test_config(&url, 2))
        .unwrap()
        .with_helper_hook(hook.clone());

    assert!(fetcher.fetch(&url).await.is_err());
    assert!(hook.urls.lock().unwrap().is_empty());
}
