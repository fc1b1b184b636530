//! Source adapters that turn fetched documents into release candidates.
//!
//! Each adapter fetches one URL and parses it. Parsing is kept in pure
//! functions so fixtures can exercise it without the network; a failure is
//! reported as `Err` and the run workflow decides what to do with it.

mod catalog;
mod feed;
mod http;
mod page;

pub use catalog::parse_catalog;
pub use feed::parse_feed;
pub use http::HttpClient;
pub use page::parse_release_page;

use crate::schema::ReleaseItem;
use anyhow::Result;

/// Anything that can produce candidates for one configured source.
pub trait CandidateSource {
    /// Label used in logs, usually the URL.
    fn label(&self) -> &str;
    fn fetch(&self) -> Result<Vec<ReleaseItem>>;
}

/// RSS or Atom feed of release announcements.
pub struct FeedSource {
    url: String,
    client: HttpClient,
}

impl FeedSource {
    pub fn new(url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl CandidateSource for FeedSource {
    fn label(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<ReleaseItem>> {
        let fetched = self.client.get(&self.url)?;
        parse_feed(&fetched.body, fetched.last_modified.as_deref())
    }
}

/// HTML release listing.
pub struct ReleasePageSource {
    url: String,
    client: HttpClient,
}

impl ReleasePageSource {
    pub fn new(url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl CandidateSource for ReleasePageSource {
    fn label(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<ReleaseItem>> {
        let fetched = self.client.get(&self.url)?;
        let html = String::from_utf8_lossy(&fetched.body);
        parse_release_page(&html)
    }
}

/// macOS SoftwareUpdate catalog (XML property list).
pub struct MacCatalogSource {
    url: String,
    client: HttpClient,
}

impl MacCatalogSource {
    pub fn new(url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl CandidateSource for MacCatalogSource {
    fn label(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<ReleaseItem>> {
        let fetched = self.client.get(&self.url)?;
        parse_catalog(&fetched.body)
    }
}
