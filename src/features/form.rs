//! Rolling form over a team's most recent matches

use serde::{Deserialize, Serialize};

use super::ledger::HistoryEntry;
use crate::ScoreSource;

/// Averages over the last N matches of one team
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingForm {
    pub avg_scored: f64,
    pub avg_conceded: f64,
    /// Fraction of matches won (draws count as not won)
    pub win_rate: f64,
}

impl RollingForm {
    /// Form over the last `window` entries of `history`; zeros when empty
    pub fn compute(history: &[HistoryEntry], window: usize, source: ScoreSource) -> Self {
        let recent = &history[history.len().saturating_sub(window)..];
        if recent.is_empty() {
            return RollingForm::default();
        }

        let n = recent.len() as f64;
        let scored: f64 = recent.iter().map(|e| e.scored_by(source)).sum();
        let conceded: f64 = recent.iter().map(|e| e.conceded_by(source)).sum();
        let wins = recent.iter().filter(|e| e.outcome.is_win()).count();

        RollingForm {
            avg_scored: scored / n,
            avg_conceded: conceded / n,
            win_rate: wins as f64 / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TeamId, TeamOutcome};

    fn entry(scored: u8, conceded: u8) -> HistoryEntry {
        let outcome = match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => TeamOutcome::Win,
            std::cmp::Ordering::Less => TeamOutcome::Loss,
            std::cmp::Ordering::Equal => TeamOutcome::Draw,
        };
        HistoryEntry {
            match_index: 0,
            opponent: TeamId::from("Opponent"),
            was_home: true,
            scored,
            conceded,
            shots_on_target_for: scored as f64 * 3.0,
            shots_on_target_against: conceded as f64 * 3.0,
            outcome,
        }
    }

    #[test]
    fn test_empty_history() {
        let form = RollingForm::compute(&[], 5, ScoreSource::Goals);
        assert_eq!(form, RollingForm::default());
    }

    #[test]
    fn test_partial_window() {
        let history = vec![entry(3, 1), entry(1, 1)];
        let form = RollingForm::compute(&history, 5, ScoreSource::Goals);
        assert_eq!(form.avg_scored, 2.0);
        assert_eq!(form.avg_conceded, 1.0);
        assert_eq!(form.win_rate, 0.5);
    }

    #[test]
    fn test_only_last_five() {
        // Two heavy defeats followed by five 2-0 wins
        let mut history = vec![entry(0, 6), entry(0, 6)];
        history.extend((0..5).map(|_| entry(2, 0)));

        let form = RollingForm::compute(&history, 5, ScoreSource::Goals);
        assert_eq!(form.avg_scored, 2.0);
        assert_eq!(form.avg_conceded, 0.0);
        assert_eq!(form.win_rate, 1.0);
    }

    #[test]
    fn test_shots_on_target_source() {
        let history = vec![entry(2, 1)];
        let form = RollingForm::compute(&history, 5, ScoreSource::ShotsOnTarget);
        assert_eq!(form.avg_scored, 6.0);
        assert_eq!(form.avg_conceded, 3.0);
        assert_eq!(form.win_rate, 1.0);
    }
}
