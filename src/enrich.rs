//! Article description enrichment.
//!
//! Listing pages rarely carry a usable excerpt, so the article itself is
//! fetched and an excerpt is pulled from it. Strategies are tried in order
//! and the first non-empty result wins:
//!
//! 1. `<meta name="description">`
//! 2. Content paragraphs, from the first selector with qualifying matches
//! 3. `<meta property="og:description">`

use crate::fetch::Fetch;
use crate::scrapers::selector;
use crate::utils::{ELLIPSIS, sanitize, squash_whitespace};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

/// Upper bound on an enriched description, ellipsis included.
pub const DESCRIPTION_MAX_CHARS: usize = 1600;

/// Characters of text kept before the ellipsis.
const TEXT_BUDGET: usize = DESCRIPTION_MAX_CHARS - ELLIPSIS.len();

/// Paragraphs joined into one excerpt.
const MAX_PARAGRAPHS: usize = 3;

static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="og:description"]"#));

/// Paragraph selectors with the minimum text length a match needs.
static PARAGRAPH_RULES: Lazy<Vec<(Selector, usize)>> = Lazy::new(|| {
    vec![
        (selector("article p"), 50),
        (selector(r#"p[class*="lead"]"#), 50),
        (selector("p"), 80),
        (selector(r#"[class*="article-body"] p, p[class*="article-body"]"#), 50),
    ]
});

/// Fetches article pages and extracts an excerpt from them.
#[derive(Debug)]
pub struct Enricher<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: Fetch> Enricher<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Fetch `article_url` and return its excerpt, or an empty string when
    /// the page cannot be fetched or offers nothing usable.
    #[instrument(level = "debug", skip(self))]
    pub async fn enrich(&self, article_url: &str) -> String {
        let Some(body) = self.fetcher.fetch(article_url).await else {
            debug!(%article_url, "Article fetch failed; no description");
            return String::new();
        };
        let description = extract_description(&body);
        debug!(%article_url, chars = description.chars().count(), "Enriched");
        description
    }
}

/// Run the fallback chain over an article page.
pub fn extract_description(html: &str) -> String {
    let document = Html::parse_document(html);

    let from_meta = meta_content(&document, &META_DESCRIPTION);
    if !from_meta.is_empty() {
        return from_meta;
    }

    let from_paragraphs = paragraph_excerpt(&document);
    if !from_paragraphs.is_empty() {
        return from_paragraphs;
    }

    meta_content(&document, &OG_DESCRIPTION)
}

fn meta_content(document: &Html, meta: &Selector) -> String {
    document
        .select(meta)
        .filter_map(|element| element.value().attr("content"))
        .map(|content| sanitize(content, TEXT_BUDGET))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn paragraph_excerpt(document: &Html) -> String {
    for (paragraphs, min_chars) in PARAGRAPH_RULES.iter() {
        let texts: Vec<String> = document
            .select(paragraphs)
            .map(|p| squash_whitespace(&p.text().collect::<String>()))
            .filter(|text| text.chars().count() > *min_chars)
            .take(MAX_PARAGRAPHS)
            .collect();
        if !texts.is_empty() {
            return sanitize(&texts.iter().join("\n\n"), TEXT_BUDGET);
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;

    const LONG_A: &str = "Regeringen presenterade på tisdagen en ny budget som enligt finansministern ska stärka ekonomin.";
    const LONG_B: &str = "Oppositionen kritiserade förslaget och menade att det saknas satsningar på välfärden i landet.";

    #[test]
    fn test_meta_description_wins() {
        let html = format!(
            r#"<html><head>
                <meta name="description" content="Budget &amp; ekonomi: &lt;b&gt;allt&lt;/b&gt; om förslaget">
                <meta property="og:description" content="OG text">
            </head><body><article><p>{LONG_A}</p></article></body></html>"#
        );
        assert_eq!(extract_description(&html), "Budget & ekonomi: allt om förslaget");
    }

    #[test]
    fn test_article_paragraphs_joined() {
        let html = format!(
            r#"<html><body><article>
                <p>Kort ingress.</p><p>{LONG_A}</p><p>{LONG_B}</p><p>{LONG_A}</p><p>{LONG_B}</p>
            </article></body></html>"#
        );
        assert_eq!(
            extract_description(&html),
            format!("{LONG_A}\n\n{LONG_B}\n\n{LONG_A}")
        );
    }

    #[test]
    fn test_lead_paragraph_before_generic_paragraphs() {
        let lead = "Ingressen är tillräckligt lång för att räknas som en riktig ingress här.";
        let html = format!(r#"<body><p>{LONG_A}</p><p class="article-lead">{lead}</p></body>"#);
        assert_eq!(extract_description(&html), lead);
    }

    #[test]
    fn test_plain_paragraph_needs_more_than_eighty_chars() {
        let html = r#"<body><p>This paragraph is longer than fifty characters but not eighty.</p></body>"#;
        assert_eq!(extract_description(html), "");
    }

    #[test]
    fn test_paragraph_markup_and_indentation_removed() {
        let html = r#"<article><p>&lt;strong&gt;Breaking&lt;/strong&gt; the government announced a new budget today with
            many reforms</p></article>"#;
        assert_eq!(
            extract_description(html),
            "Breaking the government announced a new budget today with many reforms"
        );
    }

    #[test]
    fn test_og_description_only() {
        let html = r#"<html><head>
            <meta property="og:description" content="  Storm &amp; regn över &lt;i&gt;Bornholm&lt;/i&gt;  ">
        </head><body><p>Kort.</p></body></html>"#;
        assert_eq!(extract_description(html), "Storm & regn över Bornholm");
    }

    #[test]
    fn test_empty_meta_description_falls_through() {
        let html = format!(
            r#"<head><meta name="description" content="   "></head><body><article><p>{LONG_B}</p></article></body>"#
        );
        assert_eq!(extract_description(&html), LONG_B);
    }

    #[test]
    fn test_description_bounded() {
        let long = "ø".repeat(5000);
        let html = format!(r#"<meta name="description" content="{long}">"#);
        let out = extract_description(&html);
        assert!(out.chars().count() <= DESCRIPTION_MAX_CHARS);
        assert!(out.ends_with(ELLIPSIS));

        let html = format!("<article><p>{long}</p></article>");
        assert!(extract_description(&html).chars().count() <= DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn test_nothing_usable() {
        assert_eq!(extract_description("<html><body><div>Hej</div></body></html>"), "");
    }

    #[tokio::test]
    async fn test_enrich_fetch_failure_is_empty() {
        let fetcher = MockFetcher::new();
        let enricher = Enricher::new(&fetcher);
        assert_eq!(enricher.enrich("https://www.bbc.com/news/gone").await, "");
    }

    #[tokio::test]
    async fn test_enrich_fetches_article() {
        let fetcher = MockFetcher::new().with(
            "https://www.bbc.com/news/1",
            r#"<meta name="description" content="Markets rallied on Tuesday.">"#,
        );
        let enricher = Enricher::new(&fetcher);
        assert_eq!(
            enricher.enrich("https://www.bbc.com/news/1").await,
            "Markets rallied on Tuesday."
        );
    }
}
