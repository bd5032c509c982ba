//! Per-tournament season processing.
//!
//! The processor ties the collaborators together: pull a season's full
//! history from the data source, replay it through the rating model and
//! standings fold, then atomically replace both persisted snapshots. One
//! processor run owns each season's rating set for the duration of its
//! replay; callers must not run two passes over the same season key
//! concurrently.

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::TournamentConfig;
use crate::data::MatchDataSource;
use crate::engine::replay::SeasonReplayer;
use crate::storage::SnapshotStore;
use crate::types::{RatingsSnapshot, SeasonKey, StandingsSnapshot};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Summary of one processed tournament season.
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub tournament_id: String,
    pub tournament_name: String,
    pub season_id: String,
    pub weeks_replayed: usize,
    pub matches_replayed: usize,
    pub matches_skipped: usize,
    /// Team currently top of the table, if any matches were played.
    pub leader: Option<String>,
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

pub struct SeasonProcessor<S, P> {
    source: S,
    store: P,
}

impl<S: MatchDataSource, P: SnapshotStore> SeasonProcessor<S, P> {
    pub fn new(source: S, store: P) -> Self {
        Self { source, store }
    }

    /// Process every configured tournament in order.
    ///
    /// A failing tournament is logged and skipped so one bad feed cannot
    /// block the rest; replay is idempotent, so the next run simply redoes it.
    pub async fn process_all(&self, tournaments: &[TournamentConfig]) -> Vec<ProcessReport> {
        let mut reports = Vec::new();
        for tournament in tournaments {
            match self.process_one(tournament).await {
                Ok(Some(report)) => {
                    info!(
                        tournament = %tournament.name,
                        season = %report.season_id,
                        weeks = report.weeks_replayed,
                        matches = report.matches_replayed,
                        skipped = report.matches_skipped,
                        "Season processed"
                    );
                    reports.push(report);
                }
                Ok(None) => {
                    info!(tournament = %tournament.name, "No finished weeks yet, nothing to persist");
                }
                Err(e) => {
                    error!(tournament = %tournament.name, error = %e, "Season processing failed");
                }
            }
        }
        reports
    }

    /// Fetch, replay, and persist one tournament's current season.
    ///
    /// Returns `Ok(None)` when the season has no finished weeks yet (nothing
    /// is persisted). Persistence failures propagate; nothing is retried here.
    pub async fn process_one(
        &self,
        tournament: &TournamentConfig,
    ) -> Result<Option<ProcessReport>> {
        let history = self
            .source
            .season_history(&tournament.id)
            .await
            .with_context(|| format!("Failed to fetch season history for {}", tournament.id))?;

        let key = SeasonKey::new(tournament.id.as_str(), history.season_id.as_str());
        let Some(outcome) = SeasonReplayer::replay(&key, &history.weeks)? else {
            return Ok(None);
        };

        let ratings = RatingsSnapshot::new(key.clone(), outcome.ratings);
        self.store
            .replace_ratings(&ratings)
            .with_context(|| format!("Failed to persist ratings snapshot for {key}"))?;

        let standings = StandingsSnapshot::new(
            key.clone(),
            outcome.standings.latest_week,
            outcome.standings.table,
        );
        self.store
            .replace_standings(&standings)
            .with_context(|| format!("Failed to persist standings snapshot for {key}"))?;

        Ok(Some(ProcessReport {
            tournament_id: tournament.id.clone(),
            tournament_name: tournament.name.clone(),
            season_id: history.season_id,
            weeks_replayed: outcome.weeks_replayed,
            matches_replayed: outcome.matches_replayed,
            matches_skipped: outcome.matches_skipped,
            leader: standings.table.first().map(|row| row.team.clone()),
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
