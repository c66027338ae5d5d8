//! Baseline snapshot persistence.
//!
//! Snapshots are plain JSON files. Loading distinguishes missing from
//! corrupt so the report can say which, but neither ever fails the run:
//! the comparison section is simply marked missing.

use anyhow::{Context, Result};
use concord_core::BaselineSnapshot;
use std::path::Path;

/// Outcome of loading a baseline snapshot.
#[derive(Debug)]
pub enum BaselineStatus {
    /// A snapshot was loaded and can be compared against.
    Loaded(BaselineSnapshot),

    /// No snapshot exists at the configured path.
    Missing,

    /// A file exists but does not decode as a snapshot.
    Corrupt,
}

/// Loads the baseline from disk. Never errors; see [`BaselineStatus`].
pub fn load(path: &Path) -> BaselineStatus {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return BaselineStatus::Missing,
    };
    match serde_json::from_str(&content) {
        Ok(snapshot) => BaselineStatus::Loaded(snapshot),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "baseline is corrupt");
            BaselineStatus::Corrupt
        }
    }
}

/// Saves a snapshot, creating parent directories as needed.
pub fn save(path: &Path, snapshot: &BaselineSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(snapshot).context("failed to encode baseline")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/baseline.json");

        let snapshot = BaselineSnapshot {
            overall_score: 87,
            total_issues: 4,
            ..Default::default()
        };
        save(&path, &snapshot).unwrap();

        match load(&path) {
            BaselineStatus::Loaded(restored) => assert_eq!(restored, snapshot),
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn test_missing() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            load(&temp.path().join("nope.json")),
            BaselineStatus::Missing
        ));
    }

    #[test]
    fn test_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("baseline.json");
        std::fs::write(&path, "{ truncated").unwrap();
        assert!(matches!(load(&path), BaselineStatus::Corrupt));
    }
}
