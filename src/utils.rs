//! Text helpers shared by the feed parser, extractors and enricher.
//!
//! This module provides:
//! - Markup stripping and character-safe truncation for descriptions
//! - Whitespace collapsing for titles
//! - A char-safe preview helper for log fields

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

/// Appended to text that was cut short.
pub const ELLIPSIS: &str = "...";

/// Matches tag-shaped text left over after entity decoding (`&lt;b&gt;` → `<b>`).
static RESIDUAL_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?[A-Za-z!][^<>]*>").expect("residual tag pattern is valid")
});

/// Strip markup, decode entities, trim and truncate to `max_chars`.
///
/// The input is parsed as an HTML fragment, so tags disappear and entities
/// such as `&amp;` or `&nbsp;` are decoded. Tags that only appear after
/// decoding (double-escaped markup) are removed as well.
///
/// # Returns
///
/// Plain text of at most `max_chars` characters plus [`ELLIPSIS`] when it had
/// to be cut.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize("<p>Hello &amp; bye</p>", 200), "Hello & bye");
/// assert_eq!(sanitize("abcdef", 3), "abc...");
/// ```
pub fn sanitize(raw: &str, max_chars: usize) -> String {
    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();
    let text = RESIDUAL_TAG.replace_all(&text, "");
    truncate_chars(text.trim(), max_chars)
}

/// Truncate to `max_chars` characters, appending [`ELLIPSIS`] when cut.
///
/// Counts `char`s rather than bytes so multi-byte text (å, ø, emoji) is
/// never split.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((byte_idx, _)) => format!("{}{}", &s[..byte_idx], ELLIPSIS),
    }
}

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((byte_idx, _)) => format!("{}…(+{} bytes)", &s[..byte_idx], s.len() - byte_idx),
    }
}
