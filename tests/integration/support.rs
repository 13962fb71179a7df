use std::sync::Arc;
use webcrawler::config::{CacheMode, Config};
use webcrawler::crawler::{Fetcher, Worker};
use webcrawler::link::LinkPolicy;
use webcrawler::storage::{Frontier, KvStore, PageStore, SqlitePageStore, VisitedIndex};
use wiremock::ResponseTemplate;

/// In-memory stores plus a worker wired to them
pub struct Harness {
    pub store: Arc<KvStore>,
    pub frontier: Frontier,
    pub visited: VisitedIndex,
    pub pages: Arc<dyn PageStore>,
    pub worker: Worker,
}

/// Creates a test configuration crawling from `initial_url`
pub fn test_config(initial_url: &str, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.initial_url = initial_url.to_string();
    config.crawler.max_depth = max_depth;
    config.crawler.max_concurrency = 4;
    config.cache.mode = CacheMode::Mem;
    config.fetch.timeout_secs = 5;
    config
}

pub fn harness(config: &Config) -> Harness {
    let store = Arc::new(KvStore::open_in_memory().unwrap());
    let frontier = Frontier::new(Arc::clone(&store));
    let visited = VisitedIndex::new(Arc::clone(&store));
    let pages: Arc<dyn PageStore> = Arc::new(SqlitePageStore::open_in_memory().unwrap());
    let fetcher = Arc::new(Fetcher::new(config).unwrap());

    let worker = Worker::new(
        frontier.clone(),
        visited.clone(),
        Arc::clone(&pages),
        fetcher,
        Arc::new(LinkPolicy::from_config(&config.filter)),
        config.crawler.max_depth,
    );

    Harness {
        store,
        frontier,
        visited,
        pages,
        worker,
    }
}

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}
