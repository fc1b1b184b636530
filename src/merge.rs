//! Reconciliation of release observations into one canonical record per family.
//!
//! The fold is order-sensitive: web-sourced records are folded first, in source
//! order, then catalog-sourced records. Within a merge key the incoming record
//! is marked `confirmed` when its build string equals the current canonical's
//! build, and only then is the replacement decided. When the incoming record
//! loses that decision the mark moves to the record that stays canonical, so a
//! second source reporting the same build always leaves a confirmed record.

use crate::schema::{Channel, OsKind, ReleaseItem, SourceStatus};
use crate::versioning;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Grouping key: records sharing it compete to be canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub kind: OsKind,
    pub channel: Channel,
    pub normalized_version: String,
}

impl MergeKey {
    pub fn of(item: &ReleaseItem) -> Self {
        Self {
            kind: item.kind,
            channel: item.channel,
            normalized_version: normalize_version(&item.version),
        }
    }
}

/// Lowercases, drops "beta"/"rc", trims; "17.0 Beta" and "17.0" fold together.
pub fn normalize_version(version: &str) -> String {
    version
        .to_lowercase()
        .replace("beta", "")
        .replace("rc", "")
        .trim()
        .to_string()
}

/// Whether `incoming` should displace `current` as canonical for their key.
pub fn supersedes(incoming: &ReleaseItem, current: &ReleaseItem) -> bool {
    if versioning::greater(&incoming.version, &current.version) {
        return true;
    }
    if !versioning::equal(&incoming.version, &current.version) {
        return false;
    }
    let (rank_in, rank_cur) = (incoming.channel.priority(), current.channel.priority());
    if rank_in != rank_cur {
        return rank_in > rank_cur;
    }
    beta_rank(incoming) > beta_rank(current)
}

/// Marks `incoming` confirmed when it reports exactly the build `current` holds.
///
/// Version or channel equality alone never confirms, and neither does a pair of
/// empty (unknown) builds.
pub fn mark_confirmation(current: &ReleaseItem, incoming: &mut ReleaseItem) -> bool {
    if !incoming.build.is_empty() && current.build == incoming.build {
        incoming.status = SourceStatus::Confirmed;
        true
    } else {
        false
    }
}

fn beta_rank(item: &ReleaseItem) -> i64 {
    item.beta_number.map_or(-1, i64::from)
}

/// Insertion-ordered map from merge key to the current canonical record.
#[derive(Debug, Default)]
pub struct Reconciler {
    index: HashMap<MergeKey, usize>,
    canonical: Vec<ReleaseItem>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into the map.
    pub fn fold(&mut self, mut incoming: ReleaseItem) {
        let key = MergeKey::of(&incoming);
        let Some(&slot) = self.index.get(&key) else {
            self.index.insert(key, self.canonical.len());
            self.canonical.push(incoming);
            return;
        };
        let current = &mut self.canonical[slot];
        let confirmed = mark_confirmation(current, &mut incoming);
        if supersedes(&incoming, current) {
            tracing::debug!(
                kind = %incoming.kind,
                channel = %incoming.channel,
                version = %incoming.version,
                replaced = %current.version,
                "canonical record replaced"
            );
            *current = incoming;
        } else if confirmed {
            current.status = SourceStatus::Confirmed;
        }
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    /// Canonical records ordered by `published_at` descending.
    ///
    /// Records without a timestamp come after every dated record. The sort is
    /// stable, so equal timestamps keep first-insertion order of their keys.
    pub fn finish(self) -> Vec<ReleaseItem> {
        let mut items = self.canonical;
        items.sort_by(|a, b| match (a.published_at, b.published_at) {
            (Some(left), Some(right)) => right.cmp(&left),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        items
    }
}

/// Folds web records, then catalog records, and returns the sorted canonical list.
pub fn merge(web_items: Vec<ReleaseItem>, catalog_items: Vec<ReleaseItem>) -> Vec<ReleaseItem> {
    let observed = web_items.len() + catalog_items.len();
    let mut reconciler = Reconciler::new();
    for item in web_items.into_iter().chain(catalog_items) {
        reconciler.fold(item);
    }
    tracing::info!(observed, canonical = reconciler.len(), "reconciled releases");
    reconciler.finish()
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
