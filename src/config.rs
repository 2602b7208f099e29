//! Run configuration.
//!
//! Settings come from an optional YAML file, with CLI flags layered on top
//! (see [`crate::cli`]). Every field has a default, and the default source
//! list covers the five outlets the front page was built around.
//!
//! ```yaml
//! max_items: 50
//! http_timeout_secs: 10
//! concurrency: 1
//! sources:
//!   - name: DN
//!     extractor: dn
//!     urls:
//!       - https://www.dn.se/rss/
//!       - https://www.dn.se/nyheter/rss/
//!   - name: TV2 Bornholm
//!     enabled: false
//!     urls: ['https://www.tv2bornholm.dk/rss']
//! ```

use crate::fetch::DEFAULT_USER_AGENT;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// One upstream publisher and the URLs to try for it, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Identifier stamped on every item from this source.
    pub name: String,
    /// Candidate feed or page URLs; the first one that yields items wins.
    pub urls: Vec<String>,
    /// Disabled sources are skipped entirely.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Registered extractor key for HTML fallback (`dn`, `bbc`, `dr`).
    /// When absent the source name is tried, then the generic extractor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<String>,
}

impl SourceConfig {
    pub fn new(name: &str, urls: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
            enabled: true,
            extractor: None,
        }
    }

    pub fn with_extractor(mut self, key: &str) -> Self {
        self.extractor = Some(key.to_string());
        self
    }
}

fn default_true() -> bool {
    true
}

/// Everything a run needs besides the network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Cap on the aggregated result.
    pub max_items: usize,
    /// Per-request HTTP timeout.
    pub http_timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Sources resolved, and article pages enriched, at the same time.
    pub concurrency: usize,
    /// Also enrich feed items whose feed description is empty.
    pub enrich_feed_items: bool,
    /// Overall deadline for the run; unfinished sources contribute nothing.
    pub run_deadline_secs: Option<u64>,
    pub sources: Vec<SourceConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_items: 50,
            http_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: 1,
            enrich_feed_items: false,
            run_deadline_secs: None,
            sources: default_sources(),
        }
    }
}

/// The built-in source list.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("DN", &["https://www.dn.se/rss/", "https://www.dn.se/nyheter/rss/"])
            .with_extractor("dn"),
        SourceConfig::new(
            "Sveriges Radio",
            &[
                "https://api.sr.se/api/rss/news",
                "https://sverigesradio.se/topsy/direkt/srplay.aspx?t=rss",
                "https://www.sverigesradio.se/",
            ],
        ),
        SourceConfig::new(
            "DR",
            &[
                "https://www.dr.dk/nyheder/service/feeds/allenyheder",
                "https://www.dr.dk/nyheder/service/feeds/senestenyt",
            ],
        )
        .with_extractor("dr"),
        SourceConfig::new(
            "TV2 Bornholm",
            &["https://www.tv2bornholm.dk/rss", "https://www.tv2bornholm.dk/"],
        ),
        SourceConfig::new(
            "BBC News",
            &[
                "https://feeds.bbci.co.uk/news/rss.xml",
                "https://feeds.bbci.co.uk/news/world/rss.xml",
            ],
        )
        .with_extractor("bbc"),
    ]
}

impl Settings {
    /// Load settings from a YAML file and validate them.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML for
    /// [`Settings`], or fails [`Settings::validate`].
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_yaml(&text)?;
        info!(sources = settings.sources.len(), "Loaded configuration");
        Ok(settings)
    }

    /// Parse and validate settings from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML or invalid values.
    pub fn from_yaml(text: &str) -> Result<Self, Box<dyn Error>> {
        let settings: Self = serde_yaml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated rule.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.max_items == 0 {
            return Err("max_items must be greater than 0".into());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".into());
        }
        if self.http_timeout_secs == 0 {
            return Err("http_timeout_secs must be greater than 0".into());
        }
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err("every source needs a name".into());
            }
            if source.urls.iter().all(|u| u.trim().is_empty()) {
                return Err(format!("source {:?} has no URLs", source.name).into());
            }
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn run_deadline(&self) -> Option<Duration> {
        self.run_deadline_secs.map(Duration::from_secs)
    }

    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }
}
