//! Team performance ratings.
//!
//! Maintains one mutable rating record per team and applies a fully
//! deterministic update rule per simulated match: attack and defense react
//! to goals scored/conceded, strength to the result weighted by the
//! opponent's pre-match strength, and chaos flags "unexpected" results
//! (underdog wins, unfair draws, unlucky heavy losses).
//!
//! Both sides of a match are rated against the *pre-match* values of their
//! opponent, so the order the two updates are applied in cannot leak into
//! the result. All chaos rules that match stack additively within one match.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use thiserror::Error;

use crate::types::{MatchOutcome, StandingPoint, TeamRating};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Floor and ceiling for every rating metric.
const RATING_MIN: Decimal = dec!(0);
const RATING_MAX: Decimal = dec!(10);

/// Defense rating above which scoring a single goal is not penalised.
const STOUT_DEFENSE: Decimal = dec!(7.5);

/// Losing margin (goals) treated as a heavy defeat for the chaos rule.
const HEAVY_LOSS_MARGIN: u32 = 3;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Caller misuse: referencing a team that was never created in this rating
/// set. Distinct from the "team appears mid-season" data-noise case, which
/// the replay layer skips before ever reaching the model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("team not registered in this rating set: {0}")]
    UnknownTeam(String),
}

// ---------------------------------------------------------------------------
// Rating model
// ---------------------------------------------------------------------------

/// Rating set for one `(tournament, season)` pair.
///
/// Owned by a single replay pass for its whole duration — there is no
/// ambient shared state, and no concurrent access to one instance.
#[derive(Debug, Default)]
pub struct RatingModel {
    teams: HashMap<String, TeamRating>,
    /// First-registration order; snapshot output preserves it.
    roster: Vec<String>,
}

impl RatingModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a team with a fresh baseline rating. Idempotent.
    pub fn create_team(&mut self, name: &str) {
        if !self.teams.contains_key(name) {
            self.roster.push(name.to_string());
            self.teams.insert(name.to_string(), TeamRating::new(name));
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.teams.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TeamRating> {
        self.teams.get(name)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Apply one played match symmetrically to both teams' ratings.
    ///
    /// Both updates are computed from the pre-match state of both sides, then
    /// written back together.
    pub fn simulate_match(
        &mut self,
        home: &str,
        away: &str,
        home_goals: u32,
        away_goals: u32,
    ) -> Result<(), RatingError> {
        let pre_home = self
            .teams
            .get(home)
            .cloned()
            .ok_or_else(|| RatingError::UnknownTeam(home.to_string()))?;
        let pre_away = self
            .teams
            .get(away)
            .cloned()
            .ok_or_else(|| RatingError::UnknownTeam(away.to_string()))?;

        let next_home = rate_match(&pre_home, home_goals, away_goals, &pre_away);
        let next_away = rate_match(&pre_away, away_goals, home_goals, &pre_home);

        self.teams.insert(home.to_string(), next_home);
        self.teams.insert(away.to_string(), next_away);
        Ok(())
    }

    /// Append a `(week, position)` entry to a team's standings history.
    /// Past entries are never touched.
    pub fn record_standing(
        &mut self,
        team: &str,
        week: u32,
        position: u32,
    ) -> Result<(), RatingError> {
        let rating = self
            .teams
            .get_mut(team)
            .ok_or_else(|| RatingError::UnknownTeam(team.to_string()))?;
        rating.standings_history.push(StandingPoint { week, position });
        Ok(())
    }

    /// Consume the model, returning ratings in first-registration order.
    pub fn into_ratings(self) -> Vec<TeamRating> {
        let mut teams = self.teams;
        self.roster
            .iter()
            .filter_map(|name| teams.remove(name))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Update rule
// ---------------------------------------------------------------------------

/// Rate one side of a played match: `pre` and `opponent` are both pre-match
/// states; the returned rating is fully normalized.
fn rate_match(pre: &TeamRating, scored: u32, conceded: u32, opponent: &TeamRating) -> TeamRating {
    let outcome = MatchOutcome::from_goals(scored, conceded);

    let mut next = pre.clone();
    next.form.push(outcome);

    // Attack: reward goals; a single goal against a stout defense is excused.
    next.attack += match scored {
        0 => dec!(-0.4),
        1 if opponent.defense >= STOUT_DEFENSE => Decimal::ZERO,
        1 => dec!(-0.1),
        2 => dec!(0.3),
        _ => dec!(0.5),
    };

    // Defense: clean sheets up, anything conceded down.
    next.defense += match conceded {
        0 => dec!(0.4),
        1 => dec!(-0.1),
        _ => dec!(-0.3),
    };

    // Strength: result scaled by whether the opponent was rated higher.
    next.strength += match outcome {
        MatchOutcome::Win if opponent.strength > pre.strength => dec!(0.6),
        MatchOutcome::Win => dec!(0.3),
        MatchOutcome::Loss if opponent.strength < pre.strength => dec!(-0.5),
        MatchOutcome::Loss => dec!(-0.3),
        MatchOutcome::Draw if opponent.strength > pre.strength => dec!(0.2),
        MatchOutcome::Draw => dec!(-0.2),
    };

    // Chaos: volatility without randomness. Every rule that matches stacks.
    let was_underdog = pre.attack + pre.strength < opponent.attack + opponent.strength;
    if outcome == MatchOutcome::Win && was_underdog {
        next.chaos += dec!(0.9);
    }
    if outcome == MatchOutcome::Draw
        && pre.attack > opponent.attack
        && pre.strength > opponent.strength
    {
        next.chaos -= dec!(0.5);
    }
    if outcome == MatchOutcome::Loss
        && conceded.saturating_sub(scored) >= HEAVY_LOSS_MARGIN
        && pre.strength > opponent.strength
    {
        next.chaos -= dec!(1.0);
    }
    match outcome {
        MatchOutcome::Win => next.chaos += dec!(0.2),
        MatchOutcome::Loss => next.chaos -= dec!(0.2),
        MatchOutcome::Draw => {}
    }

    next.attack = normalize(next.attack);
    next.defense = normalize(next.defense);
    next.strength = normalize(next.strength);
    next.chaos = normalize(next.chaos);
    next
}

/// Round to two decimal places, then clamp into the rating band.
/// Idempotent: normalizing an already-normalized value is a no-op.
pub(crate) fn normalize(value: Decimal) -> Decimal {
    value.round_dp(2).clamp(RATING_MIN, RATING_MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
