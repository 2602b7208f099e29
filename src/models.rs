//! Data models for aggregated headlines.
//!
//! This module defines the records that flow through the pipeline:
//! - [`Headline`]: A title/link pair pulled out of a scraped front page
//! - [`NewsItem`]: A finished headline with description, date and source
//! - [`FrontPage`]: The time-ordered, capped result of one aggregation run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate headline found by a site extractor.
///
/// Extractors only know the title and where it links to; the source strategy
/// stamps the date and source and decides whether to enrich the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    /// Trimmed anchor text, whitespace collapsed.
    pub title: String,
    /// Absolute http(s) URL of the article.
    pub link: String,
}

/// A single aggregated news item.
///
/// `title` and `link` are never empty for items the aggregator returns, and
/// `link` is always absolute. `description` may be empty and never exceeds
/// 1600 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// The headline text.
    pub title: String,
    /// Plain-text excerpt, possibly empty.
    pub description: String,
    /// Absolute URL of the article.
    pub link: String,
    /// Publication time, or the fetch time when the upstream gave none.
    pub published_at: DateTime<Utc>,
    /// `true` when `published_at` is the fetch-time fallback rather than a
    /// parsed upstream date.
    pub date_estimated: bool,
    /// Identifier of the source this item came from.
    pub source: String,
}

impl NewsItem {
    /// Build an item from a scraped [`Headline`], dated at `fetched_at`.
    pub fn from_headline(headline: Headline, source: &str, fetched_at: DateTime<Utc>) -> Self {
        Self {
            title: headline.title,
            description: String::new(),
            link: headline.link,
            published_at: fetched_at,
            date_estimated: true,
            source: source.to_string(),
        }
    }

    /// Return the same item carrying `description`.
    pub fn with_description(self, description: String) -> Self {
        Self {
            description,
            ..self
        }
    }
}

/// The output of one aggregation run.
///
/// Items are sorted newest first and capped at the configured maximum.
#[derive(Debug, Serialize, Deserialize)]
pub struct FrontPage {
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Number of entries in `items`.
    pub item_count: usize,
    /// The aggregated items.
    pub items: Vec<NewsItem>,
}

impl FrontPage {
    pub fn new(items: Vec<NewsItem>, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            item_count: items.len(),
            items,
        }
    }

    /// An empty front page is shown as "no news available", not as an error.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
