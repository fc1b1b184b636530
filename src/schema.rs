//! Schema types for release records and the persisted state snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform or tool a release belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OsKind {
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "iPadOS")]
    IpadOs,
    #[serde(rename = "macOS")]
    MacOs,
    #[serde(rename = "watchOS")]
    WatchOs,
    #[serde(rename = "tvOS")]
    TvOs,
    #[serde(rename = "xcode")]
    Xcode,
}

impl OsKind {
    /// Name used in the state file and in fingerprints.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::IpadOs => "iPadOS",
            Self::MacOs => "macOS",
            Self::WatchOs => "watchOS",
            Self::TvOs => "tvOS",
            Self::Xcode => "xcode",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Xcode => "Xcode",
            other => other.wire_name(),
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Release maturity track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    DeveloperBeta,
    PublicBeta,
    Rc,
    Release,
}

impl Channel {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::DeveloperBeta => "developerBeta",
            Self::PublicBeta => "publicBeta",
            Self::Rc => "rc",
            Self::Release => "release",
        }
    }

    /// Tie-break rank when two records carry the same version.
    pub fn priority(self) -> u8 {
        match self {
            Self::DeveloperBeta => 3,
            Self::PublicBeta => 2,
            Self::Rc => 1,
            Self::Release => 0,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::DeveloperBeta => "Developer Beta",
            Self::PublicBeta => "Public Beta",
            Self::Rc => "RC",
            Self::Release => "Release",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Provenance marker. Only the reconciliation fold changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    AnnounceFirst,
    DeviceFirst,
    Confirmed,
}

impl SourceStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::AnnounceFirst => "announce first",
            Self::DeviceFirst => "device first",
            Self::Confirmed => "confirmed",
        }
    }
}

/// One observed release mention, as produced by a source adapter.
///
/// An empty `build` means the source did not report one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseItem {
    pub kind: OsKind,
    pub version: String,
    pub build: String,
    pub channel: Channel,
    pub beta_number: Option<u32>,
    pub published_at: Option<DateTime<Utc>>,
    pub status: SourceStatus,
    pub device_identifier: Option<String>,
}

impl ReleaseItem {
    /// Human title used in logs and the run summary.
    pub fn display_title(&self) -> String {
        let version = if self.version.contains('.') {
            self.version.clone()
        } else {
            format!("{}.0", self.version)
        };
        let kind = self.kind.display_name();
        match self.channel {
            Channel::DeveloperBeta | Channel::PublicBeta => {
                let beta = self
                    .beta_number
                    .map(|n| format!(" beta {n}"))
                    .unwrap_or_else(|| " beta".to_string());
                format!("{kind} {version}{beta} - {}", self.channel.display_name())
            }
            Channel::Rc | Channel::Release => {
                format!("{kind} {version} - {}", self.channel.display_name())
            }
        }
    }
}

/// A reconciled record together with its fingerprint, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(flatten)]
    pub item: ReleaseItem,
    pub hash: String,
}

/// On-disk snapshot of the last run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    pub items: Vec<CanonicalRecord>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
