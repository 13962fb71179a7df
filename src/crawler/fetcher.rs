//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Choosing a transport (direct, forward proxy or overlay network)
//! - Building HTTP clients with the configured user agent and timeout
//! - Rejecting non-2xx responses and disallowed content types
//! - Reading bodies within a byte budget and parsing them

use crate::config::Config;
use crate::crawler::document::Document;
use reqwest::{header::CONTENT_TYPE, Client, Proxy, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Host suffix of overlay-network sites
pub const OVERLAY_HOST_SUFFIX: &str = ".i2p";

/// Errors that end a fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} has content type {content_type:?}, which is not allowed")]
    MimeNotAllowed { url: String, content_type: String },

    #[error("{url} body exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },
}

/// How requests leave the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Direct,
    /// Forward HTTP proxy
    Proxy(String),
    /// Local HTTP proxy of an overlay network router
    Overlay(String),
}

impl Transport {
    /// Overlay wins over the forward proxy, which wins over direct
    pub fn from_config(config: &Config) -> Self {
        if config.overlay.enabled {
            Self::Overlay(config.overlay.address.clone())
        } else if config.proxy.enabled {
            Self::Proxy(config.proxy.url.clone())
        } else {
            Self::Direct
        }
    }

    pub fn timeout(&self, config: &Config) -> Duration {
        match self {
            Self::Overlay(_) => Duration::from_secs(config.overlay.timeout_secs),
            Self::Direct | Self::Proxy(_) => Duration::from_secs(config.fetch.timeout_secs),
        }
    }
}

/// Receives overlay hosts that answered `409 Conflict`
///
/// Overlay routers answer 409 when a host is unknown and a jump/helper
/// service is needed to resolve it.
pub trait HelperListHook: Send + Sync {
    fn record_helper(&self, url: &str);
}

/// Default hook; only logs
#[derive(Debug, Default)]
pub struct LogHelperHook;

impl HelperListHook for LogHelperHook {
    fn record_helper(&self, url: &str) {
        tracing::info!("Overlay host needs a helper lookup: {}", url);
    }
}

/// A successfully fetched and parsed page
#[derive(Debug)]
pub struct Fetched {
    /// Final URL after redirects
    pub final_url: String,
    pub status: u16,
    pub content_type: String,
    pub raw: Vec<u8>,
    pub document: Document,
}

/// Builds an HTTP client for the transport
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use webcrawler::config::Config;
/// use webcrawler::crawler::{build_http_client, Transport};
///
/// let config = Config::default();
/// let client = build_http_client(&config, &Transport::Direct, Duration::from_secs(5));
/// assert!(client.is_ok());
/// ```
pub fn build_http_client(
    config: &Config,
    transport: &Transport,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let builder = Client::builder()
        .user_agent(&config.fetch.user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true);

    let builder = match transport {
        Transport::Direct => builder.no_proxy(),
        Transport::Proxy(address) | Transport::Overlay(address) => {
            builder.proxy(Proxy::all(address.as_str())?)
        }
    };

    builder.build()
}

/// Substring match of the Content-Type header against the allow-list
pub fn is_allowed_mime(content_type: &str, allowed: &[String]) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    allowed
        .iter()
        .any(|mime| content_type.contains(&mime.to_ascii_lowercase()))
}

fn is_overlay_host(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
        .is_some_and(|host| host.ends_with(OVERLAY_HOST_SUFFIX))
}

pub struct Fetcher {
    client: Client,
    transport: Transport,
    allowed_mime: Vec<String>,
    max_body_bytes: usize,
    helper_hook: Arc<dyn HelperListHook>,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = Transport::from_config(config);
        let timeout = transport.timeout(config);
        let client = build_http_client(config, &transport, timeout)?;

        tracing::info!("Fetching via {:?} (timeout {}s)", transport, timeout.as_secs());

        Ok(Self {
            client,
            transport,
            allowed_mime: config.fetch.allowed_mime.clone(),
            max_body_bytes: config.fetch.max_body_bytes,
            helper_hook: Arc::new(LogHelperHook),
        })
    }

    pub fn with_helper_hook(mut self, hook: Arc<dyn HelperListHook>) -> Self {
        self.helper_hook = hook;
        self
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Fetches and parses one page
    ///
    /// # Request Flow
    ///
    /// 1. GET the URL (redirects followed by the client)
    /// 2. Non-2xx → `Status`; a 409 from an overlay host also goes to the
    ///    helper-list hook
    /// 3. Content-Type not in the allow-list → `MimeNotAllowed`, body unread
    /// 4. Body read in chunks; more than the budget → `BodyTooLarge`
    /// 5. Body parsed into a [`Document`]
    pub async fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let mut response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::CONFLICT && is_overlay_host(url) {
                self.helper_hook.record_helper(url);
            }
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_allowed_mime(&content_type, &self.allowed_mime) {
            return Err(FetchError::MimeNotAllowed {
                url: url.to_string(),
                content_type,
            });
        }

        let too_large = || FetchError::BodyTooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(too_large());
        }

        let final_url = response.url().to_string();
        let mut raw = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(request_error)? {
            if raw.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            raw.extend_from_slice(&chunk);
        }

        let document = Document::parse_bytes(&raw);

        Ok(Fetched {
            final_url,
            status: status.as_u16(),
            content_type,
            raw,
            document,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mimes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transport_selection() {
        let mut config = Config::default();
        assert_eq!(Transport::from_config(&config), Transport::Direct);

        config.proxy.enabled = true;
        assert_eq!(
            Transport::from_config(&config),
            Transport::Proxy("http://localhost:4444".to_string())
        );

        config.overlay.enabled = true;
        config.overlay.address = "http://127.0.0.1:4444".to_string();
        assert_eq!(
            Transport::from_config(&config),
            Transport::Overlay("http://127.0.0.1:4444".to_string())
        );
    }

    #[test]
    fn test_overlay_timeout_is_longer() {
        let config = Config::default();
        let direct = Transport::Direct.timeout(&config);
        let overlay = Transport::Overlay(config.overlay.address.clone()).timeout(&config);
        assert!(overlay > direct);
    }

    #[test]
    fn test_build_client_for_each_transport() {
        let config = Config::default();
        for transport in [
            Transport::Direct,
            Transport::Proxy("http://proxy.local:3128".to_string()),
            Transport::Overlay("http://localhost:4444".to_string()),
        ] {
            assert!(build_http_client(&config, &transport, Duration::from_secs(5)).is_ok());
        }
    }

    #[test]
    fn test_is_allowed_mime_substring() {
        let allowed = mimes(&["text/html", "application/xhtml+xml"]);
        assert!(is_allowed_mime("text/html; charset=utf-8", &allowed));
        assert!(is_allowed_mime("TEXT/HTML", &allowed));
        assert!(is_allowed_mime("application/xhtml+xml", &allowed));
        assert!(!is_allowed_mime("image/png", &allowed));
        assert!(!is_allowed_mime("", &allowed));
    }

    #[test]
    fn test_is_overlay_host() {
        assert!(is_overlay_host("http://stats.i2p/"));
        assert!(is_overlay_host("http://STATS.I2P/page"));
        assert!(!is_overlay_host("https://example.com/"));
        assert!(!is_overlay_host("not a url"));
    }

    #[test]
    fn test_fetcher_uses_configured_transport() {
        let mut config = Config::default();
        config.overlay.enabled = true;
        let fetcher = Fetcher::new(&config).unwrap();
        assert!(matches!(fetcher.transport(), Transport::Overlay(_)));
    }
}
