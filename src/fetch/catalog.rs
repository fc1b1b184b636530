//! macOS SoftwareUpdate catalogs, decoded from XML property lists.
//!
//! Only the `Products` dictionary matters. A product becomes a candidate when
//! it carries `OSVersion`, `BuildVersion` and `PostDate`.

use crate::classify::classify_version_channel;
use crate::schema::{OsKind, ReleaseItem, SourceStatus};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PlistDocument {
    dict: PlistDict,
}

#[derive(Debug, Default, Deserialize)]
struct PlistDict {
    #[serde(rename = "$value", default)]
    nodes: Vec<PlistNode>,
}

/// Arrays are decoded only to be skipped.
#[derive(Debug, Default, Deserialize)]
struct PlistArray {
    #[serde(rename = "$value", default)]
    _nodes: Vec<PlistNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PlistNode {
    Key(String),
    String(String),
    Date(String),
    Integer(String),
    Real(String),
    Data(#[allow(dead_code)] String),
    True,
    False,
    Dict(PlistDict),
    Array(PlistArray),
}

impl PlistNode {
    fn as_dict(&self) -> Option<&PlistDict> {
        match self {
            Self::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Text of scalar nodes; dates stay in their serialized form.
    fn as_text(&self) -> Option<&str> {
        match self {
            Self::String(text) | Self::Date(text) | Self::Integer(text) | Self::Real(text) => {
                Some(text.trim())
            }
            _ => None,
        }
    }
}

impl PlistDict {
    /// Key/value pairs in document order; a key without a value is dropped.
    fn entries(&self) -> Vec<(&str, &PlistNode)> {
        let mut pairs = Vec::new();
        let mut nodes = self.nodes.iter();
        while let Some(node) = nodes.next() {
            let PlistNode::Key(key) = node else {
                continue;
            };
            match nodes.next() {
                Some(PlistNode::Key(_)) | None => break,
                Some(value) => pairs.push((key.as_str(), value)),
            }
        }
        pairs
    }

    fn get(&self, wanted: &str) -> Option<&PlistNode> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == wanted)
            .map(|(_, value)| value)
    }

    fn text(&self, wanted: &str) -> Option<&str> {
        self.get(wanted)
            .and_then(PlistNode::as_text)
            .filter(|text| !text.is_empty())
    }
}

pub fn parse_catalog(body: &[u8]) -> Result<Vec<ReleaseItem>> {
    if body.starts_with(b"bplist") {
        return Err(anyhow!("binary property lists are not supported"));
    }
    let text = std::str::from_utf8(body).context("catalog is not valid UTF-8")?;
    let document: PlistDocument =
        quick_xml::de::from_str(text).context("parse catalog property list")?;

    let Some(products) = document.dict.get("Products").and_then(PlistNode::as_dict) else {
        return Ok(Vec::new());
    };

    let mut items = Vec::new();
    for (product_id, product) in products.entries() {
        let Some(product) = product.as_dict() else {
            continue;
        };
        let (Some(version), Some(build), Some(post_date)) = (
            product.text("OSVersion"),
            product.text("BuildVersion"),
            product.text("PostDate"),
        ) else {
            continue;
        };
        let published_at = parse_post_date(post_date);
        if published_at.is_none() {
            tracing::debug!(product_id, post_date, "unparseable catalog PostDate");
        }
        items.push(ReleaseItem {
            kind: OsKind::MacOs,
            version: version.to_string(),
            build: build.to_string(),
            channel: classify_version_channel(version),
            beta_number: None,
            published_at,
            status: SourceStatus::DeviceFirst,
            device_identifier: None,
        });
    }
    Ok(items)
}

/// RFC 3339, or a zone-less ISO date-time read as UTC.
fn parse_post_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
