//! League table computation.
//!
//! A pure fold over week batches: every match updates exactly two per-team
//! accumulators, then the table is sorted by points, goal difference, and
//! goals for. Teams tied on all three keys keep their first-appearance
//! order — the sort is stable by contract, and downstream tests rely on it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{StandingsRow, WeekBatch};

/// Ranked table plus the week it runs up to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    /// `week_number` of the last batch in the input.
    pub latest_week: u32,
    pub table: Vec<StandingsRow>,
}

/// Compute the league table over every match in `weeks`.
///
/// The caller supplies batches already truncated to the desired horizon;
/// `latest_week` is simply taken from the last batch. Returns `None` for an
/// empty input (there is no meaningful week to report) — for any non-empty,
/// well-formed input this function cannot fail.
pub fn compute(weeks: &[WeekBatch]) -> Option<Standings> {
    let latest_week = weeks.last()?.week_number;

    let mut rows: Vec<StandingsRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for batch in weeks {
        for result in &batch.matches {
            apply(
                &mut rows,
                &mut index,
                &result.home_team,
                result.home_goals,
                result.away_goals,
            );
            apply(
                &mut rows,
                &mut index,
                &result.away_team,
                result.away_goals,
                result.home_goals,
            );
        }
    }

    // Stable sort: rows tied on all three keys keep insertion order.
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });

    Some(Standings { latest_week, table: rows })
}

/// Fold one side of one match into that team's accumulator row.
fn apply(
    rows: &mut Vec<StandingsRow>,
    index: &mut HashMap<String, usize>,
    team: &str,
    scored: u32,
    conceded: u32,
) {
    let i = match index.get(team) {
        Some(&i) => i,
        None => {
            rows.push(StandingsRow::new(team));
            index.insert(team.to_string(), rows.len() - 1);
            rows.len() - 1
        }
    };

    let row = &mut rows[i];
    row.played += 1;
    row.goals_for += scored;
    row.goals_against += conceded;
    row.goal_difference = row.goals_for as i32 - row.goals_against as i32;

    if scored > conceded {
        row.wins += 1;
        row.points += 3;
    } else if scored == conceded {
        row.draws += 1;
        row.points += 1;
    } else {
        row.losses += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
