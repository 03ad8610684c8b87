//! Head-to-head record between two specific teams

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ledger::HistoryEntry;
use crate::{ScoreSource, TeamId, TeamOutcome};

/// Summary of the most recent meetings, from the current fixture's point of view
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    /// Fraction of meetings won by today's home team, wherever they were played
    pub home_win_rate: f64,
    /// Fraction of meetings won by today's away team
    pub away_win_rate: f64,
    /// Average scored by today's home team in those meetings
    pub home_goals: f64,
    /// Average scored by today's away team in those meetings
    pub away_goals: f64,
    /// Number of meetings the averages cover
    #[serde(skip)]
    pub meetings: usize,
}

/// One past meeting seen from today's home team
struct Meeting {
    home_scored: f64,
    away_scored: f64,
    home_won: bool,
    away_won: bool,
}

impl HeadToHead {
    /// Head-to-head over the last `window` meetings of `home` and `away`.
    ///
    /// Meetings are gathered from both teams' logs, de-duplicated and ordered
    /// by match sequence index before the window is applied.
    pub fn compute(
        home: &TeamId,
        home_history: &[HistoryEntry],
        away: &TeamId,
        away_history: &[HistoryEntry],
        window: usize,
        source: ScoreSource,
    ) -> Self {
        let mut meetings: BTreeMap<usize, Meeting> = BTreeMap::new();

        for entry in home_history.iter().filter(|e| e.opponent == *away) {
            meetings.entry(entry.match_index).or_insert(Meeting {
                home_scored: entry.scored_by(source),
                away_scored: entry.conceded_by(source),
                home_won: entry.outcome.is_win(),
                away_won: entry.outcome == TeamOutcome::Loss,
            });
        }
        for entry in away_history.iter().filter(|e| e.opponent == *home) {
            meetings.entry(entry.match_index).or_insert(Meeting {
                home_scored: entry.conceded_by(source),
                away_scored: entry.scored_by(source),
                home_won: entry.outcome == TeamOutcome::Loss,
                away_won: entry.outcome.is_win(),
            });
        }

        let skip = meetings.len().saturating_sub(window);
        let recent: Vec<&Meeting> = meetings.values().skip(skip).collect();
        if recent.is_empty() {
            return HeadToHead::default();
        }

        let n = recent.len() as f64;
        HeadToHead {
            home_win_rate: recent.iter().filter(|m| m.home_won).count() as f64 / n,
            away_win_rate: recent.iter().filter(|m| m.away_won).count() as f64 / n,
            home_goals: recent.iter().map(|m| m.home_scored).sum::<f64>() / n,
            away_goals: recent.iter().map(|m| m.away_scored).sum::<f64>() / n,
            meetings: recent.len(),
        }
    }
}
