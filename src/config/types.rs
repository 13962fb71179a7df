use serde::Deserialize;
use std::path::PathBuf;

/// Content types a fetched page may carry to be parsed
pub const DEFAULT_ALLOWED_MIME: &[&str] = &[
    "text/html",
    "text/plain",
    "text/xml",
    "application/xml",
    "application/xhtml+xml",
    "application/rss+xml",
    "application/atom+xml",
    "application/rdf+xml",
    "application/json",
    "application/ld+json",
    "application/vnd.geo+json",
    "application/xml-dtd",
];

/// Path suffixes of static assets and binaries that are never enqueued
pub const DEFAULT_DENY_SUFFIXES: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".svg", ".webp", ".ico", ".tif", ".tiff", ".css",
    ".js", ".mjs", ".map", ".woff", ".woff2", ".ttf", ".otf", ".eot", ".pdf", ".doc", ".docx",
    ".xls", ".xlsx", ".ppt", ".pptx", ".odt", ".zip", ".gz", ".tgz", ".bz2", ".xz", ".tar",
    ".rar", ".7z", ".exe", ".msi", ".dmg", ".iso", ".apk", ".deb", ".rpm", ".bin", ".mp3",
    ".wav", ".ogg", ".flac", ".mp4", ".m4v", ".webm", ".avi", ".mov", ".wmv", ".flv", ".mkv",
    ".torrent",
];

pub const DEFAULT_ALLOWED_SCHEMES: &[&str] = &["http", "https"];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Main configuration structure
///
/// Every section is optional; an empty file yields the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub filter: FilterConfig,
    pub fetch: FetchConfig,
    pub proxy: ProxyConfig,
    pub overlay: OverlayConfig,
    pub cache: CacheConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of frontier entries processed concurrently per batch
    pub max_concurrency: usize,

    /// Entries deeper than this are dropped when dequeued
    pub max_depth: u32,

    /// Seed used when the frontier is empty at startup
    pub initial_url: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
            max_depth: 2,
            initial_url: "https://example.com/".to_string(),
        }
    }
}

/// Link filtering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Comma-separated TLD allow-list, e.g. "com,br,i2p". Empty allows all.
    pub tlds: String,

    /// Reject links pointing at localhost or a loopback address
    pub ignore_local: bool,

    pub allowed_schemes: Vec<String>,

    pub deny_suffixes: Vec<String>,
}

impl FilterConfig {
    /// Splits the comma-separated TLD list, dropping blanks
    pub fn tld_list(&self) -> Vec<String> {
        split_comma(&self.tlds)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            tlds: String::new(),
            ignore_local: false,
            allowed_schemes: strings(DEFAULT_ALLOWED_SCHEMES),
            deny_suffixes: strings(DEFAULT_DENY_SUFFIXES),
        }
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Content-Type values (substring match) that are downloaded and parsed
    pub allowed_mime: Vec<String>,

    /// Request timeout for direct and forward-proxy fetches (seconds)
    pub timeout_secs: u64,

    /// Largest response body read before the fetch is abandoned
    pub max_body_bytes: usize,

    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            allowed_mime: strings(DEFAULT_ALLOWED_MIME),
            timeout_secs: 30,
            max_body_bytes: 10 * 1024 * 1024,
            user_agent: format!("WebCrawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Forward proxy configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProxyConfig {
    pub enabled: bool,
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:4444".to_string(),
        }
    }
}

/// Overlay network (I2P-style HTTP proxy) configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OverlayConfig {
    pub enabled: bool,

    /// Local HTTP proxy endpoint of the overlay router
    pub address: String,

    /// Request timeout when fetching through the overlay (seconds)
    pub timeout_secs: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "http://localhost:4444".to_string(),
            timeout_secs: 90,
        }
    }
}

/// Where the frontier and visited index live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    Mem,
    Disc,
}

/// Frontier / visited index storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    pub mode: CacheMode,

    /// Directory holding the on-disc store
    pub dir: PathBuf,

    /// Interval between background compactions of the on-disc store (seconds)
    pub compaction_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mode: CacheMode::Disc,
            dir: PathBuf::from("/tmp/WebCrawler"),
            compaction_interval_secs: 300,
        }
    }
}

/// Page store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite database holding page records
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./pages.db".to_string(),
        }
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks
pub fn split_comma(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comma() {
        assert_eq!(split_comma("com, br,,org "), vec!["com", "br", "org"]);
        assert!(split_comma("").is_empty());
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.crawler.max_concurrency, 10);
        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.cache.mode, CacheMode::Disc);
        assert!(config.fetch.allowed_mime.contains(&"text/html".to_string()));
        assert!(config.filter.tld_list().is_empty());
    }

    #[test]
    fn test_cache_mode_lowercase() {
        let config: Config = toml::from_str("[cache]\nmode = \"mem\"").unwrap();
        assert_eq!(config.cache.mode, CacheMode::Mem);
    }
}
