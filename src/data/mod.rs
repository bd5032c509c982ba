//! Match data sources.
//!
//! Defines the `MatchDataSource` trait the replay processor consumes, plus
//! the shipped `FixtureFileSource` that reads season histories from local
//! `matches-<id>.json` files. Live feed retrieval lives outside this crate;
//! whatever produces those files is expected to hand over histories already
//! deduplicated and in ascending week order.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::types::WeekBatch;

// ---------------------------------------------------------------------------
// Season history
// ---------------------------------------------------------------------------

/// Full finished-match history for one season of a tournament,
/// oldest week first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonHistory {
    pub season_id: String,
    pub weeks: Vec<WeekBatch>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Abstraction over wherever season histories come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchDataSource: Send + Sync {
    /// The week-by-week finished-match history for a tournament.
    async fn season_history(&self, tournament_id: &str) -> Result<SeasonHistory>;

    /// Source name for logging and identification.
    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Fixture-file source
// ---------------------------------------------------------------------------

/// Strip a feed id down to its last `:`-segment, which is what file names
/// are keyed on ("vf:tournament:31867" → "31867").
pub fn sanitize_id(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}

/// Reads season histories from `matches-<id>.json` files in a data
/// directory.
pub struct FixtureFileSource {
    dir: PathBuf,
}

impl FixtureFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn history_path(&self, tournament_id: &str) -> PathBuf {
        self.dir
            .join(format!("matches-{}.json", sanitize_id(tournament_id)))
    }
}

#[async_trait]
impl MatchDataSource for FixtureFileSource {
    async fn season_history(&self, tournament_id: &str) -> Result<SeasonHistory> {
        let path = self.history_path(tournament_id);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read match history {}", path.display()))?;
        let history: SeasonHistory = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse match history {}", path.display()))?;

        debug!(
            tournament_id,
            season_id = %history.season_id,
            weeks = history.weeks.len(),
            "Season history loaded"
        );
        Ok(history)
    }

    fn name(&self) -> &'static str {
        "fixture-files"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchResult;

    fn temp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("formbook_data_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_history() -> SeasonHistory {
        SeasonHistory {
            season_id: "season-9".to_string(),
            weeks: vec![WeekBatch {
                week_number: 1,
                schedule_date: None,
                matches: vec![MatchResult {
                    home_team: "A".to_string(),
                    away_team: "B".to_string(),
                    home_goals: 1,
                    away_goals: 0,
                    week: 1,
                }],
            }],
        }
    }

    #[test]
    fn test_sanitize_id() {
        assert_eq!(sanitize_id("vf:tournament:31867"), "31867");
        assert_eq!(sanitize_id("31867"), "31867");
    }

    #[test]
    fn test_reads_history_file() {
        let dir = temp_dir();
        let history = sample_history();
        std::fs::write(
            dir.join("matches-31867.json"),
            serde_json::to_string_pretty(&history).unwrap(),
        )
        .unwrap();

        let source = FixtureFileSource::new(&dir);
        let loaded = tokio_test::block_on(source.season_history("vf:tournament:31867")).unwrap();
        assert_eq!(loaded, history);
        assert_eq!(source.name(), "fixture-files");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_history_is_an_error() {
        let dir = temp_dir();
        let source = FixtureFileSource::new(&dir);
        let result = tokio_test::block_on(source.season_history("vf:tournament:404"));
        assert!(result.is_err());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
