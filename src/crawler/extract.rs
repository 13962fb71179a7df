//! Page data and link extraction
//!
//! This module walks a parsed [`Document`] to extract:
//! - The page title and description
//! - Other `<meta>` contents
//! - Outbound links from `<a href>` elements

use crate::crawler::document::{Document, NodeKind};
use crate::link::{prepare_link, LinkPolicy};
use url::Url;

/// Metadata extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFragment {
    pub title: String,
    pub description: String,
    pub meta: Vec<String>,
}

/// Extracts title, description and meta contents
///
/// The text of the first `<title>` wins. A `<meta>` carrying
/// `name="description"` supplies the description through its `content`;
/// every other `<meta>` with a `content` attribute is appended to `meta`.
///
/// # Example
///
/// ```
/// use webcrawler::crawler::{extract_data, Document};
///
/// let doc = Document::parse(
///     r#"<head><title>Home</title><meta name="description" content="Welcome"></head>"#,
/// );
/// let data = extract_data(&doc);
/// assert_eq!(data.title, "Home");
/// assert_eq!(data.description, "Welcome");
/// ```
pub fn extract_data(document: &Document) -> PageFragment {
    let mut fragment = PageFragment::default();
    let mut seen_title = false;

    for node in document.walk() {
        let NodeKind::Element { tag, attrs } = &node.kind else {
            continue;
        };

        match tag.as_str() {
            "title" if !seen_title => {
                seen_title = true;
                fragment.title = document.text_of(node);
            }
            "meta" => {
                let Some(content) = node.attr("content") else {
                    continue;
                };
                let is_description = attrs
                    .iter()
                    .any(|(key, value)| key == "name" && value.eq_ignore_ascii_case("description"));

                if is_description {
                    fragment.description = content.to_string();
                } else {
                    fragment.meta.push(content.to_string());
                }
            }
            _ => {}
        }
    }

    fragment
}

/// Collects prepared links from every `<a href>`, in document order
///
/// Links rejected by [`prepare_link`] are dropped.
pub fn extract_links(parent: &Url, document: &Document, policy: &LinkPolicy) -> Vec<String> {
    document
        .walk()
        .filter(|node| node.tag() == Some("a"))
        .filter_map(|node| node.attr("href"))
        .filter_map(|href| match prepare_link(href, parent, policy) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::debug!("Dropping link {:?} on {}: {}", href, parent, e);
                None
            }
        })
        .collect()
}
