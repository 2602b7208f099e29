//! Dagens Nyheter front page.
//!
//! DN wraps teasers in `<article>` or `div.article*` blocks, with a few bare
//! `h2 > a` / `h3 > a` headings mixed in. Block candidates use their first
//! nested link. No minimum title length is applied.

use super::{Extractor, anchor_headline, builtin_url, selector};
use crate::models::Headline;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

const CAP: usize = 10;

pub(super) static ORIGIN: Lazy<Url> = Lazy::new(|| builtin_url("https://www.dn.se"));

static CANDIDATES: Lazy<Selector> =
    Lazy::new(|| selector(r#"article, div[class*="article"], h2 > a, h3 > a"#));
static NESTED_LINK: Lazy<Selector> = Lazy::new(|| selector("h2 > a, h3 > a, a"));

#[derive(Debug, Clone, Copy, Default)]
pub struct DnExtractor;

impl Extractor for DnExtractor {
    fn key(&self) -> &'static str {
        "dn"
    }

    fn extract(&self, document: &Html, _base_url: &Url) -> Vec<Headline> {
        document
            .select(&CANDIDATES)
            .filter_map(|candidate| {
                let anchor = if candidate.value().name() == "a" {
                    candidate
                } else {
                    candidate.select(&NESTED_LINK).next()?
                };
                anchor_headline(anchor, &ORIGIN)
            })
            .take(CAP)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<Headline> {
        let document = Html::parse_document(html);
        DnExtractor.extract(&document, &Url::parse("https://www.dn.se/").unwrap())
    }

    #[test]
    fn test_articles_use_nested_link() {
        let headlines = extract(
            r#"<html><body>
            <article><span>Ekonomi</span><a href="/ekonomi/rantan/">Räntan sänks</a></article>
            <div class="article-teaser"><a href="https://www.dn.se/sport/fotboll/">Kort</a></div>
            </body></html>"#,
        );

        assert_eq!(
            headlines,
            vec![
                Headline {
                    title: "Räntan sänks".to_string(),
                    link: "https://www.dn.se/ekonomi/rantan/".to_string(),
                },
                Headline {
                    title: "Kort".to_string(),
                    link: "https://www.dn.se/sport/fotboll/".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_short_titles_kept_and_empty_skipped() {
        let headlines = extract(
            r#"<h3><a href="/a">Val</a></h3>
               <h3><a href="/b">   </a></h3>
               <h3><a>Utan länk här</a></h3>
               <article><p>Inget ankare</p></article>"#,
        );
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "Val");
        assert_eq!(headlines[0].link, "https://www.dn.se/a");
    }

    #[test]
    fn test_capped_at_ten() {
        let html: String = (0..25)
            .map(|i| format!(r#"<h2><a href="/nyhet/{i}">Nyhet {i}</a></h2>"#))
            .collect();
        let headlines = extract(&html);
        assert_eq!(headlines.len(), CAP);
        assert_eq!(headlines[9].link, "https://www.dn.se/nyhet/9");
    }

    #[test]
    fn test_relative_links_resolve_to_dn_even_from_other_base() {
        let document = Html::parse_document(r#"<h2><a href="/x">Rubrik här</a></h2>"#);
        let headlines = DnExtractor.extract(&document, &Url::parse("https://mirror.example/dn").unwrap());
        assert_eq!(headlines[0].link, "https://www.dn.se/x");
    }
}
