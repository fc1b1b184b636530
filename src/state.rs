//! Load and publish the persisted snapshot.
//!
//! The snapshot is replaced wholesale every run. Writes go to a temp file in
//! the destination directory and are renamed into place, so a failed run never
//! leaves a half-written state file behind.

use crate::schema::{CanonicalRecord, StateFile};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Reads the snapshot; a missing file is an empty snapshot.
pub fn load_state(path: &Path) -> Result<StateFile> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no previous state, starting empty");
        return Ok(StateFile::default());
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let state: StateFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse state {}", path.display()))?;
    tracing::debug!(path = %path.display(), items = state.items.len(), "loaded state");
    Ok(state)
}

/// Replaces the snapshot's items and atomically rewrites the file.
pub fn save_state(path: &Path, mut state: StateFile, items: Vec<CanonicalRecord>) -> Result<()> {
    state.items = items;
    let mut bytes = serde_json::to_vec_pretty(&state).context("serialize state JSON")?;
    bytes.push(b'\n');

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("create temp file in {}", parent.display()))?;
    tmp.write_all(&bytes)
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("publish {}", path.display()))?;
    tracing::info!(path = %path.display(), items = state.items.len(), "state saved");
    Ok(())
}
