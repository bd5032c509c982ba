//! Shared types for the formbook engine.
//!
//! These types form the data model used across all modules: raw match
//! results coming in from the data source, per-team ratings maintained by
//! the rating model, and the versioned snapshot artifacts written by the
//! persistence layer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Version stamp written into every persisted snapshot so future schema
/// changes can be migrated instead of guessed at.
pub const SCHEMA_VERSION: u32 = 1;

/// How many of the most recent results are kept per team.
pub const FORM_WINDOW: usize = 5;

/// Every rating metric starts here for a freshly created team.
const RATING_BASELINE: Decimal = dec!(5.0);

// ---------------------------------------------------------------------------
// Match data
// ---------------------------------------------------------------------------

/// One played fixture as delivered by the match data source.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub week: u32,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} {} (week {})",
            self.home_team, self.home_goals, self.away_goals, self.away_team, self.week
        )
    }
}

/// All finished matches of one week of a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBatch {
    pub week_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_date: Option<NaiveDate>,
    pub matches: Vec<MatchResult>,
}

// ---------------------------------------------------------------------------
// Match outcome & form window
// ---------------------------------------------------------------------------

/// Single-letter result from one team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl MatchOutcome {
    /// Derive the outcome from a team's own goals for/against.
    pub fn from_goals(scored: u32, conceded: u32) -> Self {
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => MatchOutcome::Win,
            std::cmp::Ordering::Less => MatchOutcome::Loss,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Win => write!(f, "W"),
            MatchOutcome::Draw => write!(f, "D"),
            MatchOutcome::Loss => write!(f, "L"),
        }
    }
}

/// Bounded FIFO of the most recent match outcomes.
///
/// Holds at most [`FORM_WINDOW`] entries; pushing past capacity evicts the
/// oldest. Serialized as a plain sequence (`["W", "D", "L"]`), and the bound
/// is re-enforced on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<MatchOutcome>", from = "Vec<MatchOutcome>")]
pub struct FormWindow {
    recent: VecDeque<MatchOutcome>,
}

impl FormWindow {
    pub fn new() -> Self {
        Self {
            recent: VecDeque::with_capacity(FORM_WINDOW),
        }
    }

    /// Append an outcome, evicting the oldest entry once past capacity.
    pub fn push(&mut self, outcome: MatchOutcome) {
        if self.recent.len() == FORM_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(outcome);
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Oldest-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = MatchOutcome> + '_ {
        self.recent.iter().copied()
    }

    pub fn latest(&self) -> Option<MatchOutcome> {
        self.recent.back().copied()
    }
}

impl From<FormWindow> for Vec<MatchOutcome> {
    fn from(form: FormWindow) -> Self {
        form.recent.into_iter().collect()
    }
}

impl From<Vec<MatchOutcome>> for FormWindow {
    fn from(outcomes: Vec<MatchOutcome>) -> Self {
        let mut form = FormWindow::new();
        for outcome in outcomes {
            form.push(outcome);
        }
        form
    }
}

impl fmt::Display for FormWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in self.iter() {
            write!(f, "{outcome}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Team rating
// ---------------------------------------------------------------------------

/// One `(week, position)` entry of a team's standings history.
/// Position 1 is top of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingPoint {
    pub week: u32,
    pub position: u32,
}

/// Per-team performance record, owned by the rating model for the duration
/// of one season replay.
///
/// All four metrics stay within `[0, 10]` at two-decimal precision; the
/// rating model normalizes after every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub name: String,
    pub attack: Decimal,
    pub defense: Decimal,
    pub strength: Decimal,
    pub chaos: Decimal,
    pub form: FormWindow,
    pub standings_history: Vec<StandingPoint>,
}

impl TeamRating {
    /// Fresh zero-state rating: every metric at the baseline, no history.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attack: RATING_BASELINE,
            defense: RATING_BASELINE,
            strength: RATING_BASELINE,
            chaos: RATING_BASELINE,
            form: FormWindow::new(),
            standings_history: Vec::new(),
        }
    }

    /// Most recent recorded league position, if any.
    pub fn current_position(&self) -> Option<u32> {
        self.standings_history.last().map(|p| p.position)
    }
}

impl fmt::Display for TeamRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} — ATK {:.2} | DEF {:.2} | STR {:.2} | CHAOS {:.2} | form {}",
            self.name, self.attack, self.defense, self.strength, self.chaos, self.form
        )
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// One row of a computed league table. Derived data — recomputed from the
/// match history on demand, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl StandingsRow {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }
}

impl fmt::Display for StandingsRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} P{} W{} D{} L{} GF{} GA{} GD{:+} PTS{}",
            self.team,
            self.played,
            self.wins,
            self.draws,
            self.losses,
            self.goals_for,
            self.goals_against,
            self.goal_difference,
            self.points
        )
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Identifies one season of one tournament — the unit of snapshot ownership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonKey {
    pub tournament_id: String,
    pub season_id: String,
}

impl SeasonKey {
    pub fn new(tournament_id: impl Into<String>, season_id: impl Into<String>) -> Self {
        Self {
            tournament_id: tournament_id.into(),
            season_id: season_id.into(),
        }
    }
}

impl fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tournament_id, self.season_id)
    }
}

/// Persisted rating set for one season, replaced wholesale after each
/// replay pass.
///
/// Carries no timestamp on purpose: replaying the same history twice must
/// produce byte-identical files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingsSnapshot {
    pub schema_version: u32,
    pub key: SeasonKey,
    pub teams: Vec<TeamRating>,
}

impl RatingsSnapshot {
    pub fn new(key: SeasonKey, teams: Vec<TeamRating>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            key,
            teams,
        }
    }
}

/// Persisted final league table for one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsSnapshot {
    pub schema_version: u32,
    pub key: SeasonKey,
    pub latest_week: u32,
    pub table: Vec<StandingsRow>,
}

impl StandingsSnapshot {
    pub fn new(key: SeasonKey, latest_week: u32, table: Vec<StandingsRow>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            key,
            latest_week,
            table,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_goals() {
        assert_eq!(MatchOutcome::from_goals(3, 0), MatchOutcome::Win);
        assert_eq!(MatchOutcome::from_goals(0, 3), MatchOutcome::Loss);
        assert_eq!(MatchOutcome::from_goals(2, 2), MatchOutcome::Draw);
    }

    #[test]
    fn test_form_window_evicts_oldest() {
        let mut form = FormWindow::new();
        form.push(MatchOutcome::Win);
        form.push(MatchOutcome::Win);
        form.push(MatchOutcome::Draw);
        form.push(MatchOutcome::Loss);
        form.push(MatchOutcome::Loss);
        assert_eq!(form.len(), 5);

        // Sixth result drops the first win.
        form.push(MatchOutcome::Draw);
        assert_eq!(form.len(), 5);
        let outcomes: Vec<_> = form.iter().collect();
        assert_eq!(
            outcomes,
            vec![
                MatchOutcome::Win,
                MatchOutcome::Draw,
                MatchOutcome::Loss,
                MatchOutcome::Loss,
                MatchOutcome::Draw,
            ]
        );
        assert_eq!(form.latest(), Some(MatchOutcome::Draw));
    }

    #[test]
    fn test_form_window_serde_round_trip() {
        let mut form = FormWindow::new();
        form.push(MatchOutcome::Win);
        form.push(MatchOutcome::Loss);

        let json = serde_json::to_string(&form).unwrap();
        assert_eq!(json, r#"["W","L"]"#);

        let back: FormWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, form);
    }

    #[test]
    fn test_form_window_bound_enforced_on_deserialize() {
        // Seven entries on disk collapse to the most recent five.
        let json = r#"["W","W","W","D","L","L","D"]"#;
        let form: FormWindow = serde_json::from_str(json).unwrap();
        assert_eq!(form.len(), 5);
        assert_eq!(
            form.iter().collect::<Vec<_>>(),
            vec![
                MatchOutcome::Win,
                MatchOutcome::Draw,
                MatchOutcome::Loss,
                MatchOutcome::Loss,
                MatchOutcome::Draw,
            ]
        );
    }

    #[test]
    fn test_new_team_starts_at_baseline() {
        let team = TeamRating::new("Alpha");
        assert_eq!(team.attack, RATING_BASELINE);
        assert_eq!(team.defense, RATING_BASELINE);
        assert_eq!(team.strength, RATING_BASELINE);
        assert_eq!(team.chaos, RATING_BASELINE);
        assert!(team.form.is_empty());
        assert!(team.standings_history.is_empty());
        assert_eq!(team.current_position(), None);
    }

    #[test]
    fn test_snapshots_carry_schema_version() {
        let key = SeasonKey::new("vf:tournament:1", "s1");
        let ratings = RatingsSnapshot::new(key.clone(), Vec::new());
        assert_eq!(ratings.schema_version, SCHEMA_VERSION);

        let standings = StandingsSnapshot::new(key, 4, Vec::new());
        assert_eq!(standings.schema_version, SCHEMA_VERSION);
        assert_eq!(standings.latest_week, 4);
    }
}
