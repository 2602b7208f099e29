//! Front-page headline extractors.
//!
//! When a source URL does not serve a feed, its HTML is handed to an
//! [`Extractor`] picked from the [`ExtractorRegistry`].
//!
//! # Built-in extractors
//!
//! | Key       | Module      | Cap | Min title | Relative links resolve against |
//! |-----------|-------------|-----|-----------|--------------------------------|
//! | `dn`      | [`dn`]      | 10  | none      | `https://www.dn.se`            |
//! | `bbc`     | [`bbc`]     | 15  | > 10      | `https://www.bbc.com`          |
//! | `dr`      | [`dr`]      | 10  | > 10      | `https://www.dr.dk`            |
//! | (default) | [`generic`] | 5   | > 10      | scheme + host of the page URL  |
//!
//! Selector lists are evaluated as a whole, so candidates come back in
//! document order regardless of which selector in the list matched them.

use crate::models::Headline;
use crate::utils::squash_whitespace;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::fmt;
use url::Url;

pub mod bbc;
pub mod dn;
pub mod dr;
pub mod generic;

/// Titles must be longer than this many characters, except for DN.
pub const MIN_TITLE_CHARS: usize = 10;

/// Turns a parsed front page into headline candidates.
pub trait Extractor: fmt::Debug + Send + Sync {
    /// Short key this extractor is registered under.
    fn key(&self) -> &'static str;

    /// Pull headlines out of `document`, fetched from `base_url`.
    fn extract(&self, document: &Html, base_url: &Url) -> Vec<Headline>;

    /// Whether article pages should be fetched to fill in descriptions.
    fn enriches(&self) -> bool {
        true
    }
}

/// Maps extractor keys to implementations, with [`generic::GenericExtractor`]
/// as the fallback.
#[derive(Debug)]
pub struct ExtractorRegistry {
    extractors: HashMap<&'static str, Box<dyn Extractor>>,
    fallback: Box<dyn Extractor>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(dn::DnExtractor));
        registry.register(Box::new(bbc::BbcExtractor));
        registry.register(Box::new(dr::DrExtractor));
        registry
    }
}

impl ExtractorRegistry {
    /// A registry with only the generic fallback.
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
            fallback: Box::new(generic::GenericExtractor),
        }
    }

    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.insert(extractor.key(), extractor);
    }

    /// Pick the extractor for a source.
    ///
    /// An explicit `key` wins; otherwise the source name is matched
    /// case-insensitively against registered keys, then the generic fallback
    /// is used.
    pub fn resolve(&self, key: Option<&str>, source_name: &str) -> &dyn Extractor {
        key.and_then(|k| self.get(k))
            .or_else(|| self.get(source_name))
            .unwrap_or(&*self.fallback)
    }

    fn get(&self, key: &str) -> Option<&dyn Extractor> {
        let key = key.trim().to_ascii_lowercase();
        self.extractors.get(key.as_str()).map(|e| &**e)
    }
}

/// Parse a selector that is known to be valid at compile time.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Parse a URL that is known to be valid at compile time.
pub(crate) fn builtin_url(url: &'static str) -> Url {
    Url::parse(url).unwrap_or_else(|e| panic!("invalid built-in URL {url:?}: {e}"))
}

/// Collapsed text content of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    squash_whitespace(&element.text().collect::<String>())
}

/// Resolve `href` against `origin`, keeping only http(s) results.
pub(crate) fn resolve_link(origin: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let resolved = if href.starts_with("http") {
        Url::parse(href).ok()?
    } else {
        origin.join(href).ok()?
    };
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Scheme and host of `url`, dropping path, query and port.
pub(crate) fn site_origin(url: &Url) -> Option<Url> {
    let host = url.host_str()?;
    Url::parse(&format!("{}://{}", url.scheme(), host)).ok()
}

/// Build a headline from an anchor, or `None` if it lacks a title or link.
pub(crate) fn anchor_headline(anchor: ElementRef<'_>, origin: &Url) -> Option<Headline> {
    let title = element_text(anchor);
    let href = anchor.value().attr("href")?;
    if title.is_empty() {
        return None;
    }
    let link = resolve_link(origin, href)?;
    Some(Headline { title, link })
}

/// Shared loop for extractors whose candidates are anchors: keep the first
/// `cap` anchors whose title is longer than [`MIN_TITLE_CHARS`].
pub(crate) fn collect_anchor_headlines<'a>(
    anchors: impl Iterator<Item = ElementRef<'a>>,
    origin: &Url,
    cap: usize,
) -> Vec<Headline> {
    anchors
        .filter_map(|anchor| anchor_headline(anchor, origin))
        .filter(|h| h.title.chars().count() > MIN_TITLE_CHARS)
        .take(cap)
        .collect()
}
