//! Read-only strategy analytics over season snapshots.
//!
//! Everything here consumes the rating and standings snapshots the engine
//! writes; nothing mutates engine state. Odds handling, stake sizing, and
//! bet placement live outside this crate — these helpers only answer "which
//! fixtures look worth a closer look".

use serde::Serialize;

use crate::types::{FormWindow, MatchOutcome, StandingPoint, StandingsRow, TeamRating};

// ---------------------------------------------------------------------------
// Form analysis
// ---------------------------------------------------------------------------

/// Form entries required before a summary is produced — a partial window
/// early in the season says very little.
const FORM_MIN_MATCHES: usize = 5;

/// How many recent weeks the position-trend check looks at.
const TREND_RECENT_WEEKS: usize = 4;

/// Share of recent week-over-week moves that must be upward for a team to
/// count as improving.
const TREND_IMPROVING_RATIO: f64 = 0.6;

/// Aggregated view of a team's recent form window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSummary {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub total: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    /// More wins than losses in the window.
    pub on_the_up: bool,
}

/// Summarise a form window. Returns `None` until the window is full.
pub fn analyze_form(form: &FormWindow) -> Option<FormSummary> {
    if form.len() < FORM_MIN_MATCHES {
        return None;
    }

    let mut wins = 0;
    let mut draws = 0;
    let mut losses = 0;
    for outcome in form.iter() {
        match outcome {
            MatchOutcome::Win => wins += 1,
            MatchOutcome::Draw => draws += 1,
            MatchOutcome::Loss => losses += 1,
        }
    }

    let total = form.len();
    Some(FormSummary {
        wins,
        draws,
        losses,
        total,
        win_rate: wins as f64 / total as f64 * 100.0,
        draw_rate: draws as f64 / total as f64 * 100.0,
        on_the_up: wins > losses,
    })
}

// ---------------------------------------------------------------------------
// Position trends
// ---------------------------------------------------------------------------

/// Fraction of recent week-over-week moves that improved league position
/// (position 1 is best, so a drop in number is a climb).
///
/// Returns `None` with fewer than two recent entries to compare.
pub fn climb_ratio(history: &[StandingPoint], recent_weeks: usize) -> Option<f64> {
    let mut sorted = history.to_vec();
    sorted.sort_by_key(|p| p.week);

    let start = sorted.len().saturating_sub(recent_weeks);
    let recent = &sorted[start..];
    if recent.len() < 2 {
        return None;
    }

    let mut climbed = 0usize;
    let mut total = 0usize;
    for pair in recent.windows(2) {
        if pair[1].position < pair[0].position {
            climbed += 1;
        }
        total += 1;
    }
    Some(climbed as f64 / total as f64)
}

/// Whether a team has been climbing the table over the last few weeks.
pub fn is_improving(history: &[StandingPoint]) -> bool {
    climb_ratio(history, TREND_RECENT_WEEKS)
        .map(|ratio| ratio >= TREND_IMPROVING_RATIO)
        .unwrap_or(false)
}

/// Which side of a fixture a positional-trend comparison favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendPick {
    Home,
    Away,
    NoPick,
}

/// Season-long positional profile of one team.
struct PositionProfile {
    best: u32,
    worst: u32,
    current: u32,
}

impl PositionProfile {
    fn of(history: &[StandingPoint]) -> Option<Self> {
        let current = history.last()?.position;
        let best = history.iter().map(|p| p.position).min()?;
        let worst = history.iter().map(|p| p.position).max()?;
        Some(Self { best, worst, current })
    }
}

/// Compare the two sides' standings trajectories. A side is picked only on
/// strict dominance: better best, better worst, and better current position.
pub fn compare_trends(home: &TeamRating, away: &TeamRating) -> TrendPick {
    let (Some(h), Some(a)) = (
        PositionProfile::of(&home.standings_history),
        PositionProfile::of(&away.standings_history),
    ) else {
        return TrendPick::NoPick;
    };

    if h.best < a.best && h.worst < a.worst && h.current < a.current {
        TrendPick::Home
    } else if a.best < h.best && a.worst < h.worst && a.current < h.current {
        TrendPick::Away
    } else {
        TrendPick::NoPick
    }
}

// ---------------------------------------------------------------------------
// Rank-gap fixture screen
// ---------------------------------------------------------------------------

/// An upcoming fixture to screen against the current table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub home_team: String,
    pub away_team: String,
}

/// A fixture that passed the screen, with both sides' current ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub home_team: String,
    pub away_team: String,
    pub home_rank: usize,
    pub away_rank: usize,
}

/// Screens fixtures for a strong-home-versus-struggling-away shape: home
/// side in a configured upper band, away side in the bottom band.
#[derive(Debug, Clone)]
pub struct RankGapScreen {
    pub home_rank_min: usize,
    pub home_rank_max: usize,
    pub bottom_count: usize,
}

impl Default for RankGapScreen {
    fn default() -> Self {
        Self {
            home_rank_min: 3,
            home_rank_max: 5,
            bottom_count: 5,
        }
    }
}

impl RankGapScreen {
    /// Keep fixtures pairing an upper-band home side against a bottom-band
    /// away side. Fixtures with a team absent from the table are skipped.
    pub fn screen(&self, table: &[StandingsRow], fixtures: &[Fixture]) -> Vec<Candidate> {
        let total = table.len();
        let bottom_start = total.saturating_sub(self.bottom_count) + 1;
        let rank_of = |team: &str| table.iter().position(|row| row.team == team).map(|i| i + 1);

        let mut picks = Vec::new();
        for fixture in fixtures {
            let (Some(home_rank), Some(away_rank)) =
                (rank_of(&fixture.home_team), rank_of(&fixture.away_team))
            else {
                continue;
            };

            if home_rank >= self.home_rank_min
                && home_rank <= self.home_rank_max
                && away_rank >= bottom_start
                && away_rank <= total
            {
                picks.push(Candidate {
                    home_team: fixture.home_team.clone(),
                    away_team: fixture.away_team.clone(),
                    home_rank,
                    away_rank,
                });
            }
        }
        picks
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn form(outcomes: &[MatchOutcome]) -> FormWindow {
        let mut form = FormWindow::new();
        for &o in outcomes {
            form.push(o);
        }
        form
    }

    fn points(entries: &[(u32, u32)]) -> Vec<StandingPoint> {
        entries
            .iter()
            .map(|&(week, position)| StandingPoint { week, position })
            .collect()
    }

    fn team_with_history(name: &str, entries: &[(u32, u32)]) -> TeamRating {
        let mut team = TeamRating::new(name);
        team.standings_history = points(entries);
        team
    }

    use MatchOutcome::{Draw as D, Loss as L, Win as W};

    #[test]
    fn test_analyze_form_requires_full_window() {
        assert!(analyze_form(&form(&[W, W, D, L])).is_none());
        assert!(analyze_form(&form(&[W, W, D, L, W])).is_some());
    }

    #[test]
    fn test_analyze_form_counts_and_rates() {
        let summary = analyze_form(&form(&[W, W, D, L, W])).unwrap();
        assert_eq!(summary.wins, 3);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.total, 5);
        assert!((summary.win_rate - 60.0).abs() < 1e-9);
        assert!((summary.draw_rate - 20.0).abs() < 1e-9);
        assert!(summary.on_the_up);
    }

    #[test]
    fn test_analyze_form_losing_streak_not_on_the_up() {
        let summary = analyze_form(&form(&[L, L, L, W, D])).unwrap();
        assert!(!summary.on_the_up);
    }

    #[test]
    fn test_climb_ratio_over_recent_weeks() {
        // 8 → 6 → 7 → 3: two climbs out of three moves.
        let history = points(&[(1, 8), (2, 6), (3, 7), (4, 3)]);
        let ratio = climb_ratio(&history, 4).unwrap();
        assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_climb_ratio_ignores_older_weeks() {
        // Only the last four entries count; the early collapse is ignored.
        let history = points(&[(1, 1), (2, 10), (3, 9), (4, 8), (5, 7), (6, 6)]);
        assert_eq!(climb_ratio(&history, 4).unwrap(), 1.0);
    }

    #[test]
    fn test_climb_ratio_needs_two_entries() {
        assert!(climb_ratio(&points(&[(1, 5)]), 4).is_none());
        assert!(climb_ratio(&[], 4).is_none());
    }

    #[test]
    fn test_is_improving_threshold() {
        // 3/3 climbs: improving.
        assert!(is_improving(&points(&[(1, 9), (2, 7), (3, 5), (4, 2)])));
        // 1/3 climbs: not improving.
        assert!(!is_improving(&points(&[(1, 3), (2, 5), (3, 6), (4, 4)])));
        // Too little history: not improving.
        assert!(!is_improving(&points(&[(1, 3)])));
    }

    #[test]
    fn test_compare_trends_strict_dominance() {
        let home = team_with_history("H", &[(1, 2), (2, 4), (3, 1)]);
        let away = team_with_history("A", &[(1, 6), (2, 9), (3, 7)]);
        assert_eq!(compare_trends(&home, &away), TrendPick::Home);
        assert_eq!(compare_trends(&away, &home), TrendPick::Away);
    }

    #[test]
    fn test_compare_trends_overlap_is_no_pick() {
        // Home has the better current position but a worse season low.
        let home = team_with_history("H", &[(1, 10), (2, 3)]);
        let away = team_with_history("A", &[(1, 8), (2, 5)]);
        assert_eq!(compare_trends(&home, &away), TrendPick::NoPick);
    }

    #[test]
    fn test_compare_trends_empty_history_is_no_pick() {
        let home = team_with_history("H", &[(1, 1)]);
        let away = TeamRating::new("A");
        assert_eq!(compare_trends(&home, &away), TrendPick::NoPick);
    }

    #[test]
    fn test_rank_gap_screen() {
        // Ten-team table ranked T1..T10 by name order.
        let mut table: Vec<StandingsRow> = Vec::new();
        for i in 1..=10 {
            let mut row = StandingsRow::new(format!("T{i}"));
            row.points = (10 - i) as u32 * 3;
            table.push(row);
        }

        let fixtures = vec![
            Fixture { home_team: "T3".into(), away_team: "T8".into() }, // hit
            Fixture { home_team: "T5".into(), away_team: "T6".into() }, // hit (T6 is bottom-5)
            Fixture { home_team: "T1".into(), away_team: "T10".into() }, // home too high
            Fixture { home_team: "T4".into(), away_team: "T5".into() }, // away not bottom-5
            Fixture { home_team: "T3".into(), away_team: "Unknown".into() }, // not in table
        ];

        let picks = RankGapScreen::default().screen(&table, &fixtures);
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].home_team, "T3");
        assert_eq!(picks[0].home_rank, 3);
        assert_eq!(picks[0].away_rank, 8);
        assert_eq!(picks[1].home_team, "T5");
    }

    #[test]
    fn test_rank_gap_screen_small_table() {
        // Fewer teams than the bottom band: everyone is in the bottom band.
        let table: Vec<StandingsRow> =
            (1..=4).map(|i| StandingsRow::new(format!("T{i}"))).collect();
        let fixtures = vec![Fixture { home_team: "T3".into(), away_team: "T1".into() }];

        let picks = RankGapScreen::default().screen(&table, &fixtures);
        assert_eq!(picks.len(), 1);
    }
}
