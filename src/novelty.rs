//! Fingerprints and change detection against the previous snapshot.
//!
//! The fingerprint covers kind, version, build and channel only. Status and
//! publication time are left out so a later confirmation or a re-dated entry
//! is not announced twice.

use crate::schema::{CanonicalRecord, ReleaseItem, StateFile};
use crate::util::sha256_hex;
use std::collections::HashSet;

pub fn fingerprint(item: &ReleaseItem) -> String {
    let identity = format!(
        "{}-{}-{}-{}",
        item.kind.wire_name(),
        item.version,
        item.build,
        item.channel.wire_name()
    );
    sha256_hex(identity.as_bytes())
}

pub fn seen_fingerprints(state: &StateFile) -> HashSet<String> {
    state.items.iter().map(|record| record.hash.clone()).collect()
}

/// Outcome of comparing a canonical list against prior fingerprints.
#[derive(Debug, Clone, Default)]
pub struct Novelty {
    /// Every canonical record with a fresh fingerprint, in canonical order.
    pub records: Vec<CanonicalRecord>,
    /// Records whose fingerprint was not in the previous snapshot.
    pub fresh: Vec<ReleaseItem>,
}

pub fn detect(canonical: Vec<ReleaseItem>, seen: &HashSet<String>) -> Novelty {
    let mut novelty = Novelty::default();
    for item in canonical {
        let hash = fingerprint(&item);
        if !seen.contains(&hash) {
            novelty.fresh.push(item.clone());
        }
        novelty.records.push(CanonicalRecord { item, hash });
    }
    novelty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Channel, OsKind, SourceStatus};
    use chrono::{TimeZone, Utc};

    fn ios_release() -> ReleaseItem {
        ReleaseItem {
            kind: OsKind::Ios,
            version: "18.1".to_string(),
            build: "22B83".to_string(),
            channel: Channel::Release,
            beta_number: None,
            published_at: None,
            status: SourceStatus::AnnounceFirst,
            device_identifier: None,
        }
    }

    #[test]
    fn fingerprint_hashes_identity_string() {
        assert_eq!(
            fingerprint(&ios_release()),
            sha256_hex(b"iOS-18.1-22B83-release")
        );
        let xcode = ReleaseItem {
            kind: OsKind::Xcode,
            channel: Channel::DeveloperBeta,
            ..ios_release()
        };
        assert_eq!(
            fingerprint(&xcode),
            sha256_hex(b"xcode-18.1-22B83-developerBeta")
        );
    }

    #[test]
    fn fingerprint_ignores_status_and_timestamp() {
        let announced = ios_release();
        let confirmed = ReleaseItem {
            status: SourceStatus::Confirmed,
            published_at: Some(Utc.with_ymd_and_hms(2024, 10, 28, 17, 0, 0).unwrap()),
            ..ios_release()
        };
        assert_eq!(fingerprint(&announced), fingerprint(&confirmed));

        let seen: HashSet<String> = [fingerprint(&announced)].into_iter().collect();
        let novelty = detect(vec![confirmed], &seen);
        assert!(novelty.fresh.is_empty());
        assert_eq!(novelty.records.len(), 1);
    }

    #[test]
    fn fingerprint_changes_with_build_or_channel() {
        let rebuilt = ReleaseItem {
            build: "22B91".to_string(),
            ..ios_release()
        };
        let rc = ReleaseItem {
            channel: Channel::Rc,
            ..ios_release()
        };
        assert_ne!(fingerprint(&ios_release()), fingerprint(&rebuilt));
        assert_ne!(fingerprint(&ios_release()), fingerprint(&rc));
    }

    #[test]
    fn detect_reports_unseen_in_canonical_order() {
        let first = ReleaseItem {
            version: "18.2".to_string(),
            build: "22C5109p".to_string(),
            ..ios_release()
        };
        let second = ios_release();
        let seen: HashSet<String> = [fingerprint(&second)].into_iter().collect();

        let novelty = detect(vec![first.clone(), second.clone()], &seen);
        assert_eq!(novelty.fresh, vec![first.clone()]);
        let hashes: Vec<&str> = novelty.records.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec![fingerprint(&first), fingerprint(&second)]);
    }

    #[test]
    fn seen_fingerprints_collects_state_hashes() {
        let state = StateFile {
            items: vec![CanonicalRecord {
                item: ios_release(),
                hash: "deadbeef".to_string(),
            }],
            ..StateFile::default()
        };
        let seen = seen_fingerprints(&state);
        assert!(seen.contains("deadbeef"));
        assert_eq!(seen.len(), 1);
    }
}
