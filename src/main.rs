//! # Headline Harvest
//!
//! Collects the latest headlines from a configured set of news outlets and
//! merges them into one list, newest first.
//!
//! ## Features
//!
//! - Tries each outlet's URLs in order until one yields items
//! - Parses RSS 2.0 and RSS 1.0 / RDF feeds, normalizing their dates to UTC
//! - Falls back to scraping front pages with per-site extractors
//! - Enriches scraped headlines with an excerpt from the article itself
//! - Writes a JSON document or a plain-text listing
//!
//! ## Usage
//!
//! ```sh
//! headline_harvest -c sources.yaml --format text
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: YAML file (optional) with CLI overrides
//! 2. **Resolution**: per source, feed first and page scraping second
//! 3. **Aggregation**: concatenate, sort newest first, cap
//! 4. **Output**: JSON or text to a file or stdout

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod dates;
mod enrich;
mod feed;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod source;
mod utils;

use aggregator::{AggregateOptions, Aggregator};
use cli::{Cli, Format};
use config::Settings;
use fetch::HttpFetcher;
use models::FrontPage;
use outputs::{emit, json, text};
use scrapers::ExtractorRegistry;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_harvest starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.format, ?args.output, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    args.apply_overrides(&mut settings);
    settings.validate()?;
    info!(
        sources = settings.sources.len(),
        enabled = settings.enabled_sources().count(),
        max_items = settings.max_items,
        concurrency = settings.concurrency,
        "Configuration ready"
    );

    // ---- Aggregate ----
    let fetcher = HttpFetcher::new(settings.http_timeout(), &settings.user_agent)?;
    let aggregator = Aggregator::new(
        fetcher,
        ExtractorRegistry::default(),
        AggregateOptions::from(&settings),
    );
    let items = aggregator.aggregate(&settings.sources).await;
    let front_page = FrontPage::new(items, Utc::now());

    // ---- Output ----
    let rendered = match args.format {
        Format::Json => json::render(&front_page)?,
        Format::Text => text::render(&front_page),
    };
    emit(&rendered, args.output.as_deref()).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        items = front_page.item_count,
        "Execution complete"
    );

    Ok(())
}
