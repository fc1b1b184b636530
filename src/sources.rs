//! Source list configuration and adapter routing.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Source URLs, grouped by fold order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourcesConfig {
    /// Feeds and release pages; folded first.
    #[serde(default)]
    pub www: Vec<String>,
    /// Update catalogs; folded after every web source.
    #[serde(default)]
    pub ota: Vec<String>,
}

/// Which adapter understands a configured URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Feed,
    ReleasePage,
    MacCatalog,
}

impl SourcesConfig {
    pub fn parse(text: &str) -> Result<Self> {
        // An empty document deserializes to null, not a mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("parse sources YAML")
    }
}

pub fn load_sources(path: &Path) -> Result<SourcesConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read sources {}", path.display()))?;
    let config = SourcesConfig::parse(&text)
        .with_context(|| format!("load sources {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        www = config.www.len(),
        ota = config.ota.len(),
        "loaded sources"
    );
    Ok(config)
}

pub fn web_format(url: &str) -> SourceFormat {
    if url.ends_with(".rss") {
        SourceFormat::Feed
    } else {
        SourceFormat::ReleasePage
    }
}

/// `None` means no adapter exists for this catalog URL.
pub fn catalog_format(url: &str) -> Option<SourceFormat> {
    url.contains("sucatalog").then_some(SourceFormat::MacCatalog)
}
