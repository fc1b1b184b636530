//! End-to-end runs of the `relwatch` binary that need no network.
//!
//! Failing sources point at a closed localhost port so the fail-open path is
//! exercised without depending on outside hosts.

mod common;

use common::Workspace;

const PRIOR_STATE: &str = r#"{
  "items": [
    {
      "kind": "iOS",
      "version": "18.1",
      "build": "22B83",
      "channel": "release",
      "betaNumber": null,
      "publishedAt": "2024-10-28T17:00:00Z",
      "status": "confirmed",
      "deviceIdentifier": null,
      "hash": "previous-hash"
    }
  ],
  "note": "kept across runs"
}"#;

#[test]
fn empty_sources_write_empty_state() {
    let workspace = Workspace::new();
    workspace.write_sources("www: []\nota: []\n");

    let result = workspace.run(&[]);
    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("no new releases"));
    assert!(result.stdout.contains("0 new release(s), 0 tracked"));

    let state = workspace.read_state();
    assert_eq!(state["items"], serde_json::json!([]));
}

#[test]
fn state_is_replaced_wholesale_and_extra_keys_survive() {
    let workspace = Workspace::new();
    workspace.write_sources("www: []\n");
    workspace.write_state(PRIOR_STATE);

    let result = workspace.run(&[]);
    assert!(result.success, "stderr: {}", result.stderr);

    let state = workspace.read_state();
    assert_eq!(state["items"], serde_json::json!([]));
    assert_eq!(state["note"], "kept across runs");
}

#[test]
fn unreachable_sources_fail_open() {
    let workspace = Workspace::new();
    workspace.write_sources(
        "www:\n  - http://127.0.0.1:1/news/releases/rss/releases.rss\n  - http://127.0.0.1:1/news/releases/\nota:\n  - http://127.0.0.1:1/index-15.sucatalog\n  - http://127.0.0.1:1/mobile-assets.xml\n",
    );

    let result = workspace.run(&["--timeout-secs", "5"]);
    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("3 source(s) failed"));
    assert!(result.stderr.contains("no adapter for catalog source"));
    assert_eq!(workspace.read_state()["items"], serde_json::json!([]));
}

#[test]
fn dry_run_leaves_state_untouched() {
    let workspace = Workspace::new();
    workspace.write_sources("www: []\n");
    workspace.write_state(PRIOR_STATE);

    let result = workspace.run(&["--dry-run"]);
    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("seen (dry run)"));

    let state = workspace.read_state();
    assert_eq!(state["items"][0]["hash"], "previous-hash");
}

#[test]
fn corrupt_state_fails_the_run() {
    let workspace = Workspace::new();
    workspace.write_sources("www: []\n");
    workspace.write_state("{\"items\": [");

    let result = workspace.run(&[]);
    assert!(!result.success);
    assert!(result.stderr.contains("parse state"));
}

#[test]
fn missing_sources_file_fails_the_run() {
    let workspace = Workspace::new();
    let result = workspace.run(&[]);
    assert!(!result.success);
    assert!(!workspace.state_path().exists());
}
