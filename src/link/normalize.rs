use url::Url;

/// Query parameters removed from every prepared link
///
/// The literal `#` key shows up when a fragment marker was percent-encoded
/// into the query string.
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "#",
];

/// Removes tracking parameters and re-encodes the remaining query
///
/// Remaining parameters are sorted by key (values of a repeated key keep
/// their relative order). A query left empty is removed entirely, so
/// `https://example.com/?utm_source=x` becomes `https://example.com/`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webcrawler::link::strip_tracking_params;
///
/// let mut url = Url::parse("https://example.com/page?utm_source=x&id=1").unwrap();
/// strip_tracking_params(&mut url);
/// assert_eq!(url.as_str(), "https://example.com/page?id=1");
/// ```
pub fn strip_tracking_params(url: &mut Url) {
    if url.query().is_none() {
        return;
    }

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    if params.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(params.iter());
    }
}
