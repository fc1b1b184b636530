//! Title classification for feed and release-page headlines.
//!
//! Titles look like "iOS 17.5 RC (21F79)", "Xcode 16 beta 2 (16A5171d)" or
//! "tvOS 18 (22L123)". A title that names no known platform is noise and
//! yields `None`.

use crate::schema::{Channel, OsKind, ReleaseItem, SourceStatus};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Kind needles in match order. "ipados" contains "ios", so it goes first.
const KIND_NEEDLES: [(&str, OsKind); 6] = [
    ("xcode", OsKind::Xcode),
    ("ipados", OsKind::IpadOs),
    ("ios", OsKind::Ios),
    ("macos", OsKind::MacOs),
    ("watchos", OsKind::WatchOs),
    ("tvos", OsKind::TvOs),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFacts {
    pub kind: OsKind,
    pub version: String,
    pub build: String,
    pub channel: Channel,
    pub beta_number: Option<u32>,
}

impl TitleFacts {
    pub fn into_item(
        self,
        status: SourceStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> ReleaseItem {
        ReleaseItem {
            kind: self.kind,
            version: self.version,
            build: self.build,
            channel: self.channel,
            beta_number: self.beta_number,
            published_at,
            status,
            device_identifier: None,
        }
    }
}

fn build_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([A-Za-z0-9]+)\)").expect("regex for build token"))
}

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+){0,3})").expect("regex for version run"))
}

fn beta_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)beta\s*(\d+)").expect("regex for beta number"))
}

pub fn classify_kind(title: &str) -> Option<OsKind> {
    let lower = title.to_lowercase();
    KIND_NEEDLES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, kind)| *kind)
}

pub fn classify_title(title: &str) -> Option<TitleFacts> {
    let kind = classify_kind(title)?;
    let lower = title.to_lowercase();

    let build = build_re()
        .captures(title)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let channel = if lower.contains("public beta") {
        Channel::PublicBeta
    } else if lower.contains("beta") {
        Channel::DeveloperBeta
    } else if lower.contains("rc") {
        Channel::Rc
    } else {
        Channel::Release
    };

    // Callers must tolerate a non-numeric version; the whole title is the fallback.
    let version = version_re()
        .find(title)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| title.to_string());

    let beta_number = beta_number_re()
        .captures(title)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    Some(TitleFacts {
        kind,
        version,
        build,
        channel,
        beta_number,
    })
}

/// Channel for catalog entries, which only carry a version string.
pub fn classify_version_channel(version: &str) -> Channel {
    let lower = version.to_lowercase();
    if lower.contains("beta") {
        Channel::DeveloperBeta
    } else if lower.contains("rc") {
        Channel::Rc
    } else {
        Channel::Release
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_release_candidate_title() {
        let facts = classify_title("iOS 17.5 RC (21F79)").expect("classifiable");
        assert_eq!(facts.kind, OsKind::Ios);
        assert_eq!(facts.version, "17.5");
        assert_eq!(facts.build, "21F79");
        assert_eq!(facts.channel, Channel::Rc);
        assert_eq!(facts.beta_number, None);
    }

    #[test]
    fn classifies_developer_beta_with_number() {
        let facts = classify_title("Xcode 16 beta 2 (16A5171d)").expect("classifiable");
        assert_eq!(facts.kind, OsKind::Xcode);
        assert_eq!(facts.version, "16");
        assert_eq!(facts.build, "16A5171d");
        assert_eq!(facts.channel, Channel::DeveloperBeta);
        assert_eq!(facts.beta_number, Some(2));
    }

    #[test]
    fn public_beta_wins_over_developer_beta() {
        let facts = classify_title("macOS Sequoia 15.1 Public Beta 3 (24B5035e)")
            .expect("classifiable");
        assert_eq!(facts.kind, OsKind::MacOs);
        assert_eq!(facts.channel, Channel::PublicBeta);
        assert_eq!(facts.beta_number, Some(3));
    }

    #[test]
    fn ipados_is_not_mistaken_for_ios() {
        let facts = classify_title("iPadOS 18.1 (22B83)").expect("classifiable");
        assert_eq!(facts.kind, OsKind::IpadOs);
        assert_eq!(facts.channel, Channel::Release);
    }

    #[test]
    fn kind_match_is_case_insensitive() {
        assert_eq!(classify_kind("WATCHOS 11 (22R349)"), Some(OsKind::WatchOs));
        assert_eq!(classify_kind("tvos 18"), Some(OsKind::TvOs));
        assert_eq!(classify_kind("Safari 18 release notes"), None);
        assert!(classify_title("Swift Student Challenge").is_none());
    }

    #[test]
    fn beta_number_tolerates_missing_whitespace() {
        let facts = classify_title("watchOS 11 Beta3 (22R5318h)").expect("classifiable");
        assert_eq!(facts.beta_number, Some(3));
        assert_eq!(facts.channel, Channel::DeveloperBeta);
    }

    #[test]
    fn missing_build_and_version_degrade_gracefully() {
        let facts = classify_title("tvOS release notes").expect("classifiable");
        assert_eq!(facts.build, "");
        assert_eq!(facts.version, "tvOS release notes");
        assert_eq!(facts.channel, Channel::Release);
    }

    #[test]
    fn catalog_channel_comes_from_version_text() {
        assert_eq!(classify_version_channel("15.1 Beta"), Channel::DeveloperBeta);
        assert_eq!(classify_version_channel("15.1 RC"), Channel::Rc);
        assert_eq!(classify_version_channel("15.1"), Channel::Release);
    }
}
