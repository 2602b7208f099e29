//! Danmarks Radio front page.
//!
//! DR renders article bodies client-side, so there is nothing useful to
//! enrich from; items from this extractor keep an empty description.

use super::{Extractor, builtin_url, collect_anchor_headlines, selector};
use crate::models::Headline;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

const CAP: usize = 10;

pub(super) static ORIGIN: Lazy<Url> = Lazy::new(|| builtin_url("https://www.dr.dk"));

static HEADLINE_LINKS: Lazy<Selector> =
    Lazy::new(|| selector("h1 > a, h2 > a, h3 > a, article a"));

#[derive(Debug, Clone, Copy, Default)]
pub struct DrExtractor;

impl Extractor for DrExtractor {
    fn key(&self) -> &'static str {
        "dr"
    }

    fn extract(&self, document: &Html, _base_url: &Url) -> Vec<Headline> {
        collect_anchor_headlines(document.select(&HEADLINE_LINKS), &ORIGIN, CAP)
    }

    fn enriches(&self) -> bool {
        false
    }
}
