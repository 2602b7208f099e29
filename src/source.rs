//! Per-source resolution: try each configured URL until one yields items.
//!
//! For every URL, in configured order:
//!
//! 1. Fetch it. A failed fetch moves on to the next URL.
//! 2. Parse the body as a feed. Feed items are returned as they are.
//! 3. Otherwise scrape it with the source's extractor, enriching
//!    descriptions from the article pages unless the extractor opts out.
//!
//! The first URL producing any items wins; later URLs are never fetched.

use crate::config::SourceConfig;
use crate::enrich::Enricher;
use crate::feed::parse_feed;
use crate::fetch::Fetch;
use crate::models::NewsItem;
use crate::scrapers::ExtractorRegistry;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Resolves sources against a fetcher and an extractor registry.
#[derive(Debug)]
pub struct SourceStrategy<'a, F> {
    fetcher: &'a F,
    registry: &'a ExtractorRegistry,
    /// Article pages enriched at the same time.
    concurrency: usize,
    enrich_feed_items: bool,
}

impl<'a, F: Fetch> SourceStrategy<'a, F> {
    pub fn new(fetcher: &'a F, registry: &'a ExtractorRegistry) -> Self {
        Self {
            fetcher,
            registry,
            concurrency: 1,
            enrich_feed_items: false,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Also enrich feed items that arrive without a description.
    pub fn with_feed_enrichment(mut self, enabled: bool) -> Self {
        self.enrich_feed_items = enabled;
        self
    }

    /// Return the items of the first URL of `source` that yields any.
    ///
    /// Never fails: fetch and parse problems are logged and the next URL is
    /// tried. An exhausted source returns an empty list.
    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    pub async fn resolve_source(&self, source: &SourceConfig) -> Vec<NewsItem> {
        let urls = source.urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty());
        for url in urls {
            let Some(body) = self.fetcher.fetch(url).await else {
                warn!(source = %source.name, %url, "Fetch failed; trying next URL");
                continue;
            };
            let fetched_at = Utc::now();

            let feed_items = parse_feed(&body, &source.name, url, fetched_at);
            if !feed_items.is_empty() {
                info!(source = %source.name, %url, count = feed_items.len(), "Using feed");
                if self.enrich_feed_items {
                    return self.fill_descriptions(feed_items).await;
                }
                return feed_items;
            }

            let scraped = self.scrape(source, url, &body, fetched_at).await;
            if !scraped.is_empty() {
                info!(source = %source.name, %url, count = scraped.len(), "Using scraped page");
                return scraped;
            }

            debug!(source = %source.name, %url, "Neither feed nor page yielded items");
        }

        warn!(source = %source.name, urls = source.urls.len(), "All URLs exhausted without items");
        Vec::new()
    }

    async fn scrape(
        &self,
        source: &SourceConfig,
        url: &str,
        body: &str,
        fetched_at: DateTime<Utc>,
    ) -> Vec<NewsItem> {
        let Ok(base_url) = Url::parse(url) else {
            debug!(%url, "Unparseable source URL; skipping HTML extraction");
            return Vec::new();
        };
        let extractor = self.registry.resolve(source.extractor.as_deref(), &source.name);

        let headlines = {
            let document = Html::parse_document(body);
            extractor.extract(&document, &base_url)
        };
        debug!(extractor = extractor.key(), count = headlines.len(), "Extracted headlines");

        let items: Vec<NewsItem> = headlines
            .into_iter()
            .map(|headline| NewsItem::from_headline(headline, &source.name, fetched_at))
            .collect();

        if extractor.enriches() {
            self.fill_descriptions(items).await
        } else {
            items
        }
    }

    /// Enrich every item lacking a description, keeping item order.
    async fn fill_descriptions(&self, items: Vec<NewsItem>) -> Vec<NewsItem> {
        let enricher = Enricher::new(self.fetcher);
        let enricher = &enricher;
        stream::iter(items)
            .map(move |item| async move {
                if item.description.is_empty() {
                    let description = enricher.enrich(&item.link).await;
                    item.with_description(description)
                } else {
                    item
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
