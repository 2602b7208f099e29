//! BBC News front page.

use super::{Extractor, builtin_url, collect_anchor_headlines, selector};
use crate::models::Headline;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

const CAP: usize = 15;

pub(super) static ORIGIN: Lazy<Url> = Lazy::new(|| builtin_url("https://www.bbc.com"));

static HEADLINE_LINKS: Lazy<Selector> = Lazy::new(|| selector("h3 > a, h2 > a, article a"));

#[derive(Debug, Clone, Copy, Default)]
pub struct BbcExtractor;

impl Extractor for BbcExtractor {
    fn key(&self) -> &'static str {
        "bbc"
    }

    fn extract(&self, document: &Html, _base_url: &Url) -> Vec<Headline> {
        collect_anchor_headlines(document.select(&HEADLINE_LINKS), &ORIGIN, CAP)
    }
}
