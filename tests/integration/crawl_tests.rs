use crate::support::{harness, html, test_config};
use std::sync::Arc;
use webcrawler::crawler::{Coordinator, Fetcher};
use webcrawler::state::PageOutcome;
use webcrawler::storage::{FrontierEntry, PageRecord};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROOT_PAGE: &str = r#"<html><head>
<title>Home</title>
<meta name="description" content="The home page">
</head><body>
<p>Welcome to the crawler test site. Crawler tests are fun.</p>
<a href="/a">Page A</a>
<a href="/b?utm_source=home">Page B</a>
<a href="/logo.png">Logo</a>
</body></html>"#;

#[tokio::test]
async fn test_worker_enqueues_admissible_links_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(ROOT_PAGE))
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let root = format!("{}/", base);
    let h = harness(&test_config(&root, 2));

    let outcome = h.worker.process(FrontierEntry::new(root.clone(), 0)).await;
    assert_eq!(outcome, PageOutcome::Processed { links_enqueued: 2 });

    let queued = h.frontier.read_all().unwrap();
    assert_eq!(
        queued,
        vec![
            FrontierEntry::new(format!("{}/a", base), 1),
            FrontierEntry::new(format!("{}/b", base), 1),
        ]
    );

    assert!(h.visited.is_visited(&root));

    let record = h.pages.find_page_by_url(&root).unwrap().unwrap();
    assert_eq!(record.title, "Home");
    assert_eq!(record.description, "The home page");
    assert_eq!(record.links.len(), 2);
    assert_eq!(record.words.get("crawler"), Some(&2));
    assert!(record.visited);
}

#[tokio::test]
async fn test_disallowed_mime_marks_visited_without_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1, 2, 3, 4], "image/png"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/image", mock_server.uri());
    let h = harness(&test_config(&url, 2));

    let outcome = h.worker.process(FrontierEntry::new(url.clone(), 0)).await;

    assert_eq!(outcome, PageOutcome::MimeNotAllowed);
    assert!(h.visited.is_visited(&url));
    assert!(h.pages.find_page_by_url(&url).unwrap().is_none());
    assert!(h.frontier.is_empty().unwrap());
}

#[tokio::test]
async fn test_fetch_failure_marks_visited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url = format!("{}/gone", mock_server.uri());
    let h = harness(&test_config(&url, 2));

    let outcome = h.worker.process(FrontierEntry::new(url.clone(), 0)).await;

    assert_eq!(outcome, PageOutcome::FetchFailed);
    assert!(h.visited.is_visited(&url));
    assert!(h.pages.find_page_by_url(&url).unwrap().is_none());
}

#[tokio::test]
async fn test_tld_allow_list_blocks_other_hosts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="https://example.org/x">org</a><a href="https://example.com/y">com</a>"#,
        ))
        .mount(&mock_server)
        .await;

    let root = format!("{}/", mock_server.uri());
    let mut config = test_config(&root, 2);
    config.filter.tlds = "org".to_string();
    let h = harness(&config);

    let outcome = h.worker.process(FrontierEntry::new(root.clone(), 0)).await;
    assert_eq!(outcome, PageOutcome::Processed { links_enqueued: 1 });

    let queued = h.frontier.read_all().unwrap();
    assert_eq!(queued, vec![FrontierEntry::new("https://example.org/x", 1)]);

    // Rejected links are still recorded on the page
    let record = h.pages.find_page_by_url(&root).unwrap().unwrap();
    assert_eq!(record.links.len(), 2);
}

#[tokio::test]
async fn test_full_crawl_respects_max_depth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/a">A</a><a href="/b">B</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<title>A</title><a href="/c">C</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html("<title>B</title>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Depth 2, never fetched
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html("<title>C</title>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let config = test_config(&format!("{}/", base), 1);
    let h = harness(&config);

    let coordinator = Coordinator::with_stores(
        config.clone(),
        Arc::clone(&h.store),
        Arc::clone(&h.pages),
        Fetcher::new(&config).unwrap(),
    );
    let summary = coordinator.run().await;

    assert_eq!(summary.processed(), 3);
    // /c is enqueued at depth 2 and dropped when dequeued
    assert_eq!(summary.count(PageOutcome::DepthExceeded), 1);
    assert_eq!(summary.failed(), 0);

    for page in ["/", "/a", "/b"] {
        let url = format!("{}{}", base, page);
        assert!(h.pages.find_page_by_url(&url).unwrap().is_some(), "{} missing", url);
        assert!(h.visited.is_visited(&url));
    }
    assert!(h.pages.find_page_by_url(&format!("{}/c", base)).unwrap().is_none());
    assert!(h.frontier.is_empty().unwrap());
}

#[tokio::test]
async fn test_recovery_sync_skips_stored_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<title>Should not be fetched</title>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let root = format!("{}/", mock_server.uri());
    let config = test_config(&root, 2);
    let h = harness(&config);

    // A previous run stored the page, but the visited index was lost
    h.pages.insert_page(&PageRecord::new(root.clone())).unwrap();
    assert!(!h.visited.is_visited(&root));

    let coordinator = Coordinator::with_stores(
        config.clone(),
        Arc::clone(&h.store),
        Arc::clone(&h.pages),
        Fetcher::new(&config).unwrap(),
    );
    let summary = coordinator.run().await;

    assert!(h.visited.is_visited(&root));
    assert_eq!(summary.count(PageOutcome::AlreadyVisited), 1);
    assert_eq!(summary.processed(), 0);
}

#[tokio::test]
async fn test_interrupted_frontier_is_resumed_not_reseeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/left-over"))
        .respond_with(html("<title>Left over</title>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<title>Seed</title>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let config = test_config(&format!("{}/", base), 2);
    let h = harness(&config);
    h.frontier.enqueue(&format!("{}/left-over", base), 1).unwrap();

    let coordinator = Coordinator::with_stores(
        config.clone(),
        Arc::clone(&h.store),
        Arc::clone(&h.pages),
        Fetcher::new(&config).unwrap(),
    );
    let summary = coordinator.run().await;

    assert_eq!(summary.processed(), 1);
    assert!(h.frontier.is_empty().unwrap());
}
