//! Fallback extractor for sources without a dedicated one.
//!
//! Takes heading links plus article links that carry more than ten
//! characters of their own text, and resolves relative links against the
//! scheme and host of the page that was fetched.

use super::{Extractor, MIN_TITLE_CHARS, collect_anchor_headlines, selector, site_origin};
use crate::models::Headline;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const CAP: usize = 5;

static HEADLINE_LINKS: Lazy<Selector> =
    Lazy::new(|| selector("h1 > a, h2 > a, h3 > a, article a"));
static HEADING_LINKS: Lazy<Selector> = Lazy::new(|| selector("h1 > a, h2 > a, h3 > a"));

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericExtractor;

impl Extractor for GenericExtractor {
    fn key(&self) -> &'static str {
        "generic"
    }

    fn extract(&self, document: &Html, base_url: &Url) -> Vec<Headline> {
        let Some(origin) = site_origin(base_url) else {
            return Vec::new();
        };
        let candidates = document
            .select(&HEADLINE_LINKS)
            .filter(|anchor| HEADING_LINKS.matches(anchor) || own_text_chars(*anchor) > MIN_TITLE_CHARS);
        collect_anchor_headlines(candidates, &origin, CAP)
    }
}

/// Characters in the anchor's direct text children, ignoring nested elements.
fn own_text_chars(anchor: ElementRef<'_>) -> usize {
    anchor
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim().chars().count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, base: &str) -> Vec<Headline> {
        let document = Html::parse_document(html);
        GenericExtractor.extract(&document, &Url::parse(base).unwrap())
    }

    #[test]
    fn test_relative_links_use_page_origin() {
        let headlines = extract(
            r#"<h2><a href="/nyheder/brand-i-roenne">Brand i Rønne natten til i dag</a></h2>"#,
            "https://www.tv2bornholm.dk/nyheder/seneste?page=2",
        );
        assert_eq!(
            headlines[0].link,
            "https://www.tv2bornholm.dk/nyheder/brand-i-roenne"
        );
    }

    #[test]
    fn test_article_links_need_own_text() {
        let headlines = extract(
            r#"<article>
                 <a href="/a"><img src="x.jpg"><span>Lång rubrik inne i span</span></a>
                 <a href="/b">Direkt text som är lång</a>
               </article>"#,
            "https://www.sverigesradio.se/",
        );
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].link, "https://www.sverigesradio.se/b");
    }

    #[test]
    fn test_capped_at_five() {
        let html: String = (0..12)
            .map(|i| format!(r#"<h3><a href="/n/{i}">Nyhetsrubrik nummer {i}</a></h3>"#))
            .collect();
        assert_eq!(extract(&html, "https://example.org/").len(), 5);
    }

    #[test]
    fn test_every_link_is_absolute_http() {
        let headlines = extract(
            r#"<h2><a href="javascript:void(0)">Click here to open menu</a></h2>
               <h2><a href="relative/path">Relative path headline</a></h2>
               <h2><a href="http://plain.example/x">Plain http headline</a></h2>"#,
            "https://example.org/news/",
        );
        assert_eq!(headlines.len(), 2);
        assert!(headlines.iter().all(|h| h.link.starts_with("http")));
        assert_eq!(headlines[0].link, "https://example.org/relative/path");
    }
}
