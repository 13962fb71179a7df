use crate::link::filter::{has_deny_suffix, is_local};
use crate::link::normalize::strip_tracking_params;
use crate::link::{LinkPolicy, LinkRejection};
use url::{ParseError, Url};

/// Turns a raw `href` into a normalized absolute URL
///
/// Absolute links are parsed as-is. Relative links are resolved against the
/// root of the parent's origin after one leading `/` or `.` is dropped, so
/// `./about` and `/about` on `https://example.com/a/b` both become
/// `https://example.com/about`. Tracking parameters are stripped and the
/// remaining query is re-encoded in key order. The fragment is kept.
///
/// Rejections, in the order they are checked:
/// * the raw value cannot be parsed ([`LinkRejection::Parse`])
/// * a relative link has nothing before its query or fragment
///   ([`LinkRejection::EmptyPath`])
/// * the host is local while `ignore_local` is set ([`LinkRejection::Local`])
/// * the path ends with a denied suffix ([`LinkRejection::Suffix`])
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webcrawler::link::{prepare_link, LinkPolicy};
///
/// let parent = Url::parse("https://example.com/a/b").unwrap();
/// let policy = LinkPolicy::default();
///
/// let url = prepare_link("/c?utm_source=x&id=1", &parent, &policy).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/c?id=1");
///
/// assert!(prepare_link("/logo.png", &parent, &policy).is_err());
/// ```
pub fn prepare_link(raw: &str, parent: &Url, policy: &LinkPolicy) -> Result<Url, LinkRejection> {
    let raw = raw.trim();

    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => resolve_relative(raw, parent)?,
        Err(e) => return Err(LinkRejection::Parse(e)),
    };

    if policy.ignore_local && is_local(&url) {
        return Err(LinkRejection::Local(url.to_string()));
    }

    strip_tracking_params(&mut url);

    if has_deny_suffix(url.path(), &policy.deny_suffixes) {
        return Err(LinkRejection::Suffix(url.to_string()));
    }

    Ok(url)
}

/// Resolves a relative link against the root of the parent's origin
///
/// Backslashes count as slashes and tabs or newlines are dropped, as URL
/// parsing does for http(s). The result always carries the parent's scheme,
/// host and port; only path, query and fragment come from the link.
fn resolve_relative(raw: &str, parent: &Url) -> Result<Url, LinkRejection> {
    let stripped = raw
        .strip_prefix('/')
        .or_else(|| raw.strip_prefix('.'))
        .unwrap_or(raw);

    let normalized: String = stripped
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .map(|c| if c == '\\' { '/' } else { c })
        .collect();
    let relative = normalized.trim_start_matches('/');

    let path = relative
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    if path.is_empty() {
        return Err(LinkRejection::EmptyPath);
    }

    let joined = parent.join(&format!("/{}", relative))?;

    let mut url = parent.clone();
    url.set_path(joined.path());
    url.set_query(joined.query());
    url.set_fragment(joined.fragment());
    Ok(url)
}
