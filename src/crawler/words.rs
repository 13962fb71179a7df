use crate::crawler::stopwords::is_stop_word;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

// Elements whose content is never page text
static RE_HIDDEN_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)\s*>").unwrap()
});
// <link> and <meta> are void elements, so only the tag itself goes
static RE_VOID_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(link|meta)\b[^>]*>").unwrap());
static RE_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static RE_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\p{Z}'-]+").unwrap());

/// Counts word frequencies in raw HTML
///
/// Script, style and noscript blocks are dropped, then every remaining tag.
/// The text is lower-cased and every run of characters other than letters,
/// digits, space separators, `'` and `-` becomes a space. Tokens shorter than
/// two characters and stop words are skipped. There is no stemming.
///
/// # Example
///
/// ```
/// use webcrawler::crawler::count_words;
///
/// let words = count_words(b"<p>The cat sat. The cat ran.</p>");
/// assert_eq!(words.get("cat"), Some(&2));
/// assert_eq!(words.get("the"), None);
/// ```
pub fn count_words(raw: &[u8]) -> HashMap<String, u32> {
    let html = String::from_utf8_lossy(raw);

    let text = RE_HIDDEN_BLOCKS.replace_all(&html, " ");
    let text = RE_VOID_TAGS.replace_all(&text, " ");
    let text = RE_TAGS.replace_all(&text, " ");
    let text = text.to_lowercase();
    let text: Cow<'_, str> = RE_NON_WORD.replace_all(&text, " ");

    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        if word.chars().count() < 2 || is_stop_word(word) {
            continue;
        }
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }

    counts
}
