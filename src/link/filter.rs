//! Predicates applied to candidate links

use url::{Host, Url};

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webcrawler::link::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true for `localhost` and loopback IP addresses
pub fn is_local(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Returns true if the lower-cased path ends with any deny suffix
pub fn has_deny_suffix(path: &str, deny_suffixes: &[String]) -> bool {
    let path = path.to_lowercase();
    deny_suffixes
        .iter()
        .any(|suffix| path.ends_with(&suffix.to_lowercase()))
}

pub fn is_allowed_scheme(url: &Url, schemes: &[String]) -> bool {
    schemes.iter().any(|s| s == url.scheme())
}

/// Returns true if the host ends with one of the TLDs, or the list is empty
pub fn has_allowed_tld(url: &Url, tlds: &[String]) -> bool {
    if tlds.is_empty() {
        return true;
    }

    match extract_host(url) {
        Some(host) => tlds
            .iter()
            .any(|tld| host.ends_with(&tld.to_lowercase())),
        None => false,
    }
}
