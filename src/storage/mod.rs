//! Snapshot persistence.
//!
//! Saves and loads the per-season rating and standings snapshots as JSON
//! files, one pair per `(tournament, season)` key. Every write is a full
//! replace through a temp-file-then-rename so a concurrent reader can never
//! observe a partially written snapshot.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::data::sanitize_id;
use crate::types::{RatingsSnapshot, SeasonKey, StandingsSnapshot};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Key-value snapshot store keyed by season. Replace semantics are atomic:
/// a reader sees either the previous snapshot or the new one, never a mix.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStore: Send + Sync {
    fn load_ratings(&self, key: &SeasonKey) -> Result<Option<RatingsSnapshot>>;
    fn replace_ratings(&self, snapshot: &RatingsSnapshot) -> Result<()>;
    fn load_standings(&self, key: &SeasonKey) -> Result<Option<StandingsSnapshot>>;
    fn replace_standings(&self, snapshot: &StandingsSnapshot) -> Result<()>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Stores each snapshot as a pretty-printed JSON file under one directory.
pub struct JsonSnapshotStore {
    dir: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn ratings_path(&self, key: &SeasonKey) -> PathBuf {
        self.dir.join(format!(
            "ratings-{}-{}.json",
            sanitize_id(&key.tournament_id),
            sanitize_id(&key.season_id)
        ))
    }

    fn standings_path(&self, key: &SeasonKey) -> PathBuf {
        self.dir.join(format!(
            "standings-{}-{}.json",
            sanitize_id(&key.tournament_id),
            sanitize_id(&key.season_id)
        ))
    }

    /// Write to a temp file in the same directory, then rename over the
    /// target. The rename is the atomic replace.
    fn write_atomic<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create snapshot dir {}", self.dir.display()))?;

        let json = serde_json::to_string_pretty(value).context("Failed to serialise snapshot")?;

        let tmp = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
        fs::write(&tmp, &json)
            .with_context(|| format!("Failed to write snapshot temp file {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| {
            format!("Failed to move snapshot into place at {}", path.display())
        })?;

        debug!(path = %path.display(), bytes = json.len(), "Snapshot replaced");
        Ok(())
    }

    /// Load and parse a snapshot file; a missing file is a fresh start.
    fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            info!(path = %path.display(), "No snapshot found, starting fresh");
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        Ok(Some(value))
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load_ratings(&self, key: &SeasonKey) -> Result<Option<RatingsSnapshot>> {
        Self::read(&self.ratings_path(key))
    }

    fn replace_ratings(&self, snapshot: &RatingsSnapshot) -> Result<()> {
        self.write_atomic(&self.ratings_path(&snapshot.key), snapshot)
    }

    fn load_standings(&self, key: &SeasonKey) -> Result<Option<StandingsSnapshot>> {
        Self::read(&self.standings_path(key))
    }

    fn replace_standings(&self, snapshot: &StandingsSnapshot) -> Result<()> {
        self.write_atomic(&self.standings_path(&snapshot.key), snapshot)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
