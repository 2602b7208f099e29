//! Cross-source aggregation.
//!
//! Every enabled source is resolved independently through
//! [`SourceStrategy`]. Results are concatenated in configuration order,
//! sorted newest first and cut to the configured cap. One source failing,
//! panicking or running past the deadline only removes that source's items.

use crate::config::{Settings, SourceConfig};
use crate::fetch::Fetch;
use crate::models::NewsItem;
use crate::scrapers::ExtractorRegistry;
use crate::source::SourceStrategy;
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};
use tracing::{error, info, instrument, warn};

/// Knobs for one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    pub max_items: usize,
    /// Sources resolved at once; also bounds article enrichment per source.
    pub concurrency: usize,
    pub enrich_feed_items: bool,
    pub run_deadline: Option<Duration>,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            max_items: 50,
            concurrency: 1,
            enrich_feed_items: false,
            run_deadline: None,
        }
    }
}

impl From<&Settings> for AggregateOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            max_items: settings.max_items,
            concurrency: settings.concurrency,
            enrich_feed_items: settings.enrich_feed_items,
            run_deadline: settings.run_deadline(),
        }
    }
}

/// Owns the fetcher and extractor registry for aggregation runs.
#[derive(Debug)]
pub struct Aggregator<F> {
    fetcher: F,
    registry: ExtractorRegistry,
    options: AggregateOptions,
}

impl<F: Fetch> Aggregator<F> {
    pub fn new(fetcher: F, registry: ExtractorRegistry, options: AggregateOptions) -> Self {
        Self {
            fetcher,
            registry,
            options,
        }
    }

    /// Resolve every enabled source and merge the results.
    ///
    /// # Returns
    ///
    /// At most `max_items` items sorted by `published_at`, newest first.
    /// Items with equal timestamps keep their concatenation order. An empty
    /// list is a valid result.
    #[instrument(level = "info", skip_all, fields(sources = sources.len()))]
    pub async fn aggregate(&self, sources: &[SourceConfig]) -> Vec<NewsItem> {
        let concurrency = self.options.concurrency.max(1);
        let strategy = SourceStrategy::new(&self.fetcher, &self.registry)
            .with_concurrency(concurrency)
            .with_feed_enrichment(self.options.enrich_feed_items);
        let strategy = &strategy;
        let deadline = self.options.run_deadline.map(|d| Instant::now() + d);

        let per_source: Vec<Vec<NewsItem>> = stream::iter(sources.iter().filter(|s| s.enabled))
            .map(move |source| isolated(strategy, source, deadline))
            .buffered(concurrency)
            .collect()
            .await;

        let contributing = per_source.iter().filter(|items| !items.is_empty()).count();
        let items = merge(per_source, self.options.max_items);
        info!(
            count = items.len(),
            contributing_sources = contributing,
            "Aggregation complete"
        );
        items
    }
}

/// Resolve one source, turning a panic or a missed deadline into no items.
async fn isolated<F: Fetch>(
    strategy: &SourceStrategy<'_, F>,
    source: &SourceConfig,
    deadline: Option<Instant>,
) -> Vec<NewsItem> {
    let resolve = AssertUnwindSafe(strategy.resolve_source(source)).catch_unwind();
    let outcome = match deadline {
        Some(deadline) => match timeout_at(deadline, resolve).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(source = %source.name, "Run deadline reached; source skipped");
                return Vec::new();
            }
        },
        None => resolve.await,
    };

    match outcome {
        Ok(items) => {
            if items.is_empty() {
                warn!(source = %source.name, "No articles found");
            } else {
                info!(source = %source.name, count = items.len(), "Collected articles");
            }
            items
        }
        Err(panic) => {
            error!(source = %source.name, panic = %panic_message(&*panic), "Source resolution panicked");
            Vec::new()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Concatenate, sort newest first (stable) and cap.
pub fn merge(per_source: Vec<Vec<NewsItem>>, max_items: usize) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = per_source.into_iter().flatten().collect();
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items.truncate(max_items);
    items
}
