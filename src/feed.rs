//! RSS feed parsing.
//!
//! Two item layouts are recognised:
//!
//! | Shape   | Path                   | Seen in            |
//! |---------|------------------------|--------------------|
//! | Channel | `<rss><channel><item>` | RSS 0.9x / 2.0     |
//! | Root    | `<rdf:RDF><item>`      | RSS 1.0 (RDF)      |
//!
//! Channel items win when both are present. Anything that is not a
//! well-formed XML document yields an empty list, which is the signal for the
//! source strategy to fall back to HTML scraping.

use crate::dates::normalize_date;
use crate::models::NewsItem;
use crate::utils::{sanitize, squash_whitespace, truncate_for_log};
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use tracing::{debug, instrument};
use url::Url;

/// Maximum characters kept from a feed item's own description.
pub const FEED_DESCRIPTION_CHARS: usize = 200;

/// Raw field text collected for one `<item>`.
#[derive(Debug, Default)]
struct RawItem {
    title: String,
    link: String,
    guid: String,
    description: String,
    pub_date: String,
    dc_date: String,
}

impl RawItem {
    /// Field for a qualified element name. Namespaced look-alikes such as
    /// `media:title` are not item fields.
    fn field_mut(&mut self, qname: &str) -> Option<&mut String> {
        match qname {
            "title" => Some(&mut self.title),
            "link" => Some(&mut self.link),
            "guid" => Some(&mut self.guid),
            "description" => Some(&mut self.description),
            "pubDate" => Some(&mut self.pub_date),
            "dc:date" => Some(&mut self.dc_date),
            _ => None,
        }
    }
}

/// Where an `<item>` sat in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Channel,
    Root,
}

/// Parse `body` as a feed and map its items to [`NewsItem`]s.
///
/// # Arguments
///
/// * `body` - The fetched document
/// * `source` - Source identifier stamped on every item
/// * `feed_url` - Used to resolve relative item links
/// * `fetched_at` - Fallback for missing or unparseable item dates
///
/// # Returns
///
/// Every item of the first recognised shape, in document order. Items with an
/// empty title or link are dropped. Malformed XML gives an empty list.
#[instrument(level = "debug", skip(body, fetched_at), fields(bytes = body.len()))]
pub fn parse_feed(
    body: &str,
    source: &str,
    feed_url: &str,
    fetched_at: DateTime<Utc>,
) -> Vec<NewsItem> {
    let raw = match read_items(body) {
        Ok(raw) => raw,
        Err(reason) => {
            debug!(
                %source,
                %feed_url,
                %reason,
                preview = %truncate_for_log(body.trim_start(), 120),
                "Not a parseable feed"
            );
            return Vec::new();
        }
    };

    let base = Url::parse(feed_url).ok();
    let items: Vec<NewsItem> = raw
        .into_iter()
        .filter_map(|item| to_news_item(item, source, base.as_ref(), fetched_at))
        .collect();

    debug!(%source, count = items.len(), "Parsed feed items");
    items
}

fn to_news_item(
    raw: RawItem,
    source: &str,
    base: Option<&Url>,
    fetched_at: DateTime<Utc>,
) -> Option<NewsItem> {
    let title = squash_whitespace(&raw.title);
    let mut link = raw.link.trim().to_string();
    if link.is_empty() && is_http_url(raw.guid.trim()) {
        link = raw.guid.trim().to_string();
    }
    let link = resolve_item_link(&link, base)?;
    if title.is_empty() {
        return None;
    }

    let date = if raw.pub_date.trim().is_empty() {
        &raw.dc_date
    } else {
        &raw.pub_date
    };
    let (published_at, date_estimated) = normalize_date(date, fetched_at);

    Some(NewsItem {
        title,
        description: sanitize(&raw.description, FEED_DESCRIPTION_CHARS),
        link,
        published_at,
        date_estimated,
        source: source.to_string(),
    })
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn resolve_item_link(link: &str, base: Option<&Url>) -> Option<String> {
    if link.is_empty() {
        return None;
    }
    let resolved = match Url::parse(link) {
        Ok(url) => url,
        Err(_) => base?.join(link).ok()?,
    };
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Walk the document and collect items of the preferred shape.
fn read_items(xml: &str) -> Result<Vec<RawItem>, String> {
    let mut reader = Reader::from_str(xml);

    // Qualified names of currently open elements.
    let mut stack: Vec<String> = Vec::new();
    let mut channel_items: Vec<RawItem> = Vec::new();
    let mut root_items: Vec<RawItem> = Vec::new();
    let mut current: Option<(Shape, RawItem)> = None;
    let mut saw_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("{e} at byte {}", reader.buffer_position()))?;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() {
                    if saw_root {
                        return Err("multiple root elements".to_string());
                    }
                    saw_root = true;
                }
                if local_part(&name) == "item" && current.is_none() {
                    let shape = match stack.len() {
                        1 => Some(Shape::Root),
                        2 if local_part(&stack[1]) == "channel" => Some(Shape::Channel),
                        _ => None,
                    };
                    if let Some(shape) = shape {
                        current = Some((shape, RawItem::default()));
                    }
                }
                stack.push(name);
            }
            Event::End(_) => {
                let closed = stack.pop().unwrap_or_default();
                let item_depth = match current {
                    Some((Shape::Root, _)) => 1,
                    Some((Shape::Channel, _)) => 2,
                    None => usize::MAX,
                };
                if local_part(&closed) == "item" && stack.len() == item_depth {
                    if let Some((shape, item)) = current.take() {
                        match shape {
                            Shape::Channel => channel_items.push(item),
                            Shape::Root => root_items.push(item),
                        }
                    }
                }
            }
            Event::Text(e) => {
                let raw = String::from_utf8_lossy(e.as_ref());
                let text = unescape(&raw).map(|t| t.into_owned()).unwrap_or_else(|_| raw.into_owned());
                push_field_text(&mut current, &stack, &text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                push_field_text(&mut current, &stack, &text);
            }
            Event::GeneralRef(e) => {
                let reference = format!("&{};", String::from_utf8_lossy(e.as_ref()));
                let text = unescape(&reference)
                    .map(|t| t.into_owned())
                    .unwrap_or(reference);
                push_field_text(&mut current, &stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err("no root element".to_string());
    }
    if !stack.is_empty() {
        return Err(format!("unclosed element <{}>", stack.join("><")));
    }

    if channel_items.is_empty() {
        Ok(root_items)
    } else {
        Ok(channel_items)
    }
}

fn local_part(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

/// Append text to the open item's field when the text sits directly inside
/// one of its child elements.
fn push_field_text(current: &mut Option<(Shape, RawItem)>, stack: &[String], text: &str) {
    let Some((shape, item)) = current.as_mut() else {
        return;
    };
    let field_depth = match shape {
        Shape::Root => 3,
        Shape::Channel => 4,
    };
    if stack.len() != field_depth {
        return;
    }
    if let Some(field) = stack.last().and_then(|name| item.field_mut(name)) {
        field.push_str(text);
    }
}
