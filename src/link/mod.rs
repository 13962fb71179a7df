//! Link handling module
//!
//! This module turns raw `href` values into normalized absolute URLs and
//! decides which of them may enter the frontier.
//!
//! Two stages are applied to every link found on a page:
//! 1. [`prepare_link`] resolves, normalizes and rejects local or asset links
//! 2. [`admit`] checks the scheme and TLD allow-lists before enqueueing

mod filter;
mod normalize;
mod prepare;

use crate::config::FilterConfig;
use thiserror::Error;
use url::Url;

pub use filter::{extract_host, has_allowed_tld, has_deny_suffix, is_allowed_scheme, is_local};
pub use normalize::{strip_tracking_params, TRACKING_PARAMS};
pub use prepare::prepare_link;

/// Why a link was dropped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkRejection {
    #[error("Unparseable link: {0}")]
    Parse(#[from] url::ParseError),

    #[error("Relative link has an empty path")]
    EmptyPath,

    #[error("Local link: {0}")]
    Local(String),

    #[error("Denied path suffix: {0}")]
    Suffix(String),

    #[error("Scheme not allowed: {0}")]
    Scheme(String),

    #[error("Host outside the TLD allow-list: {0}")]
    Tld(String),
}

/// Filtering rules shared by preparation and admission
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    pub ignore_local: bool,
    pub deny_suffixes: Vec<String>,
    pub allowed_schemes: Vec<String>,
    /// Empty allows every host
    pub tlds: Vec<String>,
}

impl LinkPolicy {
    pub fn from_config(filter: &FilterConfig) -> Self {
        Self {
            ignore_local: filter.ignore_local,
            deny_suffixes: filter.deny_suffixes.clone(),
            allowed_schemes: filter.allowed_schemes.clone(),
            tlds: filter.tld_list(),
        }
    }
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

/// Decides whether a prepared link may be enqueued
///
/// The link is re-parsed, then its scheme must be allowed and, when a TLD
/// allow-list is configured, its host must end with one of the TLDs.
///
/// # Examples
///
/// ```
/// use webcrawler::link::{admit, LinkPolicy};
///
/// let mut policy = LinkPolicy::default();
/// policy.tlds = vec!["i2p".to_string()];
///
/// assert!(admit("http://stats.i2p/", &policy).is_ok());
/// assert!(admit("https://example.com/", &policy).is_err());
/// assert!(admit("mailto:someone@stats.i2p", &policy).is_err());
/// ```
pub fn admit(link: &str, policy: &LinkPolicy) -> Result<Url, LinkRejection> {
    let url = Url::parse(link)?;

    if !is_allowed_scheme(&url, &policy.allowed_schemes) {
        return Err(LinkRejection::Scheme(url.scheme().to_string()));
    }

    if !has_allowed_tld(&url, &policy.tlds) {
        return Err(LinkRejection::Tld(
            extract_host(&url).unwrap_or_default(),
        ));
    }

    Ok(url)
}
