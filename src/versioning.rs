//! Zero-padded numeric ordering over free-form version strings.
//!
//! Only the first dotted numeric run (up to four components) matters. Channel
//! words such as "beta" and "rc" are stripped first and never influence the
//! result, so "18.1 beta" and "18.1 rc" compare equal.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

fn numeric_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+){0,3})").expect("valid version regex"))
}

/// Numeric components of a version string, `[0]` when it carries none.
pub fn components(version: &str) -> Vec<u64> {
    let stripped = version
        .to_lowercase()
        .replace("beta", "")
        .replace("rc", "");
    let Some(found) = numeric_run().find(&stripped) else {
        return vec![0];
    };
    // Components that overflow u64 saturate rather than fail the comparison.
    found
        .as_str()
        .split('.')
        .map(|part| part.parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}

pub fn compare(a: &str, b: &str) -> Ordering {
    let lhs = components(a);
    let rhs = components(b);
    let len = lhs.len().max(rhs.len());
    for idx in 0..len {
        let left = lhs.get(idx).copied().unwrap_or(0);
        let right = rhs.get(idx).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

pub fn greater(a: &str, b: &str) -> bool {
    compare(a, b) == Ordering::Greater
}

/// True when both zero-padded component sequences match ("18" equals "18.0").
pub fn equal(a: &str, b: &str) -> bool {
    compare(a, b) == Ordering::Equal
}
