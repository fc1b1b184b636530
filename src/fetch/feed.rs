//! RSS 2.0 and Atom feeds.

use crate::classify::classify_title;
use crate::schema::{ReleaseItem, SourceStatus};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct FeedDocument {
    #[serde(default)]
    channel: Option<RssChannel>,
    #[serde(rename = "entry", default)]
    entries: Vec<FeedEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<FeedEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct FeedEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
    #[serde(default)]
    published: Option<String>,
    #[serde(default)]
    updated: Option<String>,
}

pub fn parse_feed(body: &[u8], last_modified: Option<&str>) -> Result<Vec<ReleaseItem>> {
    let text = std::str::from_utf8(body).context("feed is not valid UTF-8")?;
    let document: FeedDocument = quick_xml::de::from_str(text).context("parse feed XML")?;
    let fallback = last_modified.and_then(parse_feed_date);

    let entries = document
        .channel
        .map(|channel| channel.items)
        .unwrap_or_default()
        .into_iter()
        .chain(document.entries);

    let mut items = Vec::new();
    for entry in entries {
        let title = entry.title.as_deref().unwrap_or_default().trim();
        let Some(facts) = classify_title(title) else {
            tracing::trace!(title, "skipping unclassifiable feed entry");
            continue;
        };
        // pubDate, then updated, then the response's Last-Modified.
        let published_at = entry
            .pub_date
            .as_deref()
            .or(entry.published.as_deref())
            .and_then(parse_feed_date)
            .or_else(|| entry.updated.as_deref().and_then(parse_feed_date))
            .or(fallback);
        items.push(facts.into_item(SourceStatus::AnnounceFirst, published_at));
    }
    Ok(items)
}

/// Accepts RFC 2822 (RSS, HTTP headers) and RFC 3339 (Atom) timestamps.
pub fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
