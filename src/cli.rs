//! Command-line interface definitions for Headline Harvest.
//!
//! Every flag is optional. Values given here override the configuration
//! file, which in turn overrides the built-in defaults.

use crate::config::Settings;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the aggregated front page.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON document
    Json,
    /// Plain listing for terminals
    Text,
}

/// Command-line arguments for a harvest run.
///
/// # Examples
///
/// ```sh
/// # Built-in sources, JSON on stdout
/// headline_harvest
///
/// # Custom sources, four at a time, listing written to a file
/// headline_harvest -c sources.yaml --concurrency 4 --format text -o out/news.txt
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long, env = "HEADLINES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of items in the result
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Per-request HTTP timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Sources resolved (and articles enriched) at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Overall deadline for the run in seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Output file; stdout when absent
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Layer the flags that were given over `settings`.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(max_items) = self.max_items {
            settings.max_items = max_items;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            settings.http_timeout_secs = timeout_secs;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if self.deadline_secs.is_some() {
            settings.run_deadline_secs = self.deadline_secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["headline_harvest"]);

        assert_eq!(cli.format, Format::Json);
        assert!(cli.output.is_none());
        assert!(cli.max_items.is_none());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "headline_harvest",
            "--config",
            "./sources.yaml",
            "--max-items",
            "20",
            "--format",
            "text",
            "--output",
            "./out/news.txt",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("./sources.yaml")));
        assert_eq!(cli.max_items, Some(20));
        assert_eq!(cli.format, Format::Text);
        assert_eq!(cli.output, Some(PathBuf::from("./out/news.txt")));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["headline_harvest", "-c", "/tmp/a.yaml", "-o", "/tmp/out.json"]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/a.yaml")));
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/out.json")));
    }

    #[test]
    fn test_overrides_only_given_flags() {
        let cli = Cli::parse_from([
            "headline_harvest",
            "--concurrency",
            "4",
            "--deadline-secs",
            "60",
        ]);
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);

        assert_eq!(settings.concurrency, 4);
        assert_eq!(settings.run_deadline_secs, Some(60));
        assert_eq!(settings.max_items, 50);
        assert_eq!(settings.http_timeout_secs, 10);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["headline_harvest", "--format", "markdown"]).is_err());
    }
}
