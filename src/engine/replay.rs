//! Deterministic season replay.
//!
//! Replays a full season history from week 1: teams are seeded from the
//! opening week's participants, every match is simulated in input order, and
//! after each week the table-so-far is computed so every team's league
//! position can be recorded for that week.
//!
//! Each call starts from fresh zero-state ratings — rebuilding is a full
//! replace, never an incremental merge, so the output can never drift from
//! what the match history implies.

use thiserror::Error;
use tracing::{debug, warn};

use crate::ratings::{RatingError, RatingModel};
use crate::standings::{self, Standings};
use crate::types::{SeasonKey, TeamRating, WeekBatch};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ReplayError {
    /// Week batches must arrive oldest-first with strictly increasing
    /// week numbers; anything else means the caller handed us a history
    /// that is not in temporal order.
    #[error("week numbers out of order: week {found} after week {prev}")]
    NonMonotonicWeeks { prev: u32, found: u32 },

    #[error(transparent)]
    Rating(#[from] RatingError),
}

// ---------------------------------------------------------------------------
// Replay outcome
// ---------------------------------------------------------------------------

/// Everything one replay pass produces: the final rating set (in team
/// registration order), the final table, and counters for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub key: SeasonKey,
    pub ratings: Vec<TeamRating>,
    pub standings: Standings,
    pub weeks_replayed: usize,
    pub matches_replayed: usize,
    pub matches_skipped: usize,
}

// ---------------------------------------------------------------------------
// Replayer
// ---------------------------------------------------------------------------

pub struct SeasonReplayer;

impl SeasonReplayer {
    /// Replay `weeks` (oldest first, starting at the season's first week).
    ///
    /// Returns `Ok(None)` for a season with zero weeks — a no-op, not an
    /// error. Matches referencing a team unknown to the week-1 roster
    /// (mid-season entrants) are skipped for rating purposes and counted.
    pub fn replay(
        key: &SeasonKey,
        weeks: &[WeekBatch],
    ) -> Result<Option<ReplayOutcome>, ReplayError> {
        if weeks.is_empty() {
            debug!(season = %key, "empty season history, nothing to replay");
            return Ok(None);
        }
        check_week_order(weeks)?;

        // Seed the rating set from the opening week's participants.
        let mut model = RatingModel::new();
        for result in &weeks[0].matches {
            model.create_team(&result.home_team);
            model.create_team(&result.away_team);
        }

        let mut matches_replayed = 0usize;
        let mut matches_skipped = 0usize;

        for (week_index, batch) in weeks.iter().enumerate() {
            for result in &batch.matches {
                if !model.contains(&result.home_team) || !model.contains(&result.away_team) {
                    // Mid-season entrants are expected data noise, not fatal.
                    warn!(
                        season = %key,
                        week = batch.week_number,
                        fixture = %result,
                        "participant unknown to this season, match skipped"
                    );
                    matches_skipped += 1;
                    continue;
                }
                model.simulate_match(
                    &result.home_team,
                    &result.away_team,
                    result.home_goals,
                    result.away_goals,
                )?;
                matches_replayed += 1;
            }

            // Record every known team's position in the table-so-far.
            if let Some(so_far) = standings::compute(&weeks[..=week_index]) {
                let week = week_index as u32 + 1;
                for (row_index, row) in so_far.table.iter().enumerate() {
                    if model.contains(&row.team) {
                        model.record_standing(&row.team, week, row_index as u32 + 1)?;
                    }
                }
            }
        }

        let Some(final_standings) = standings::compute(weeks) else {
            // Unreachable with a non-empty input; treat it as the no-op case.
            return Ok(None);
        };

        debug!(
            season = %key,
            weeks = weeks.len(),
            matches = matches_replayed,
            skipped = matches_skipped,
            "season replay complete"
        );

        Ok(Some(ReplayOutcome {
            key: key.clone(),
            ratings: model.into_ratings(),
            standings: final_standings,
            weeks_replayed: weeks.len(),
            matches_replayed,
            matches_skipped,
        }))
    }
}

fn check_week_order(weeks: &[WeekBatch]) -> Result<(), ReplayError> {
    for pair in weeks.windows(2) {
        if pair[1].week_number <= pair[0].week_number {
            return Err(ReplayError::NonMonotonicWeeks {
                prev: pair[0].week_number,
                found: pair[1].week_number,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
