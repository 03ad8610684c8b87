//! Elo rating system for team strength estimation
//!
//! Tracks one rating per team, updated once per processed match.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{EloConfig, FullTimeResult, TeamId};

/// Elo rating tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloRatings {
    ratings: BTreeMap<TeamId, f64>,
    config: EloConfig,
}

impl Default for EloRatings {
    fn default() -> Self {
        Self::new(EloConfig::default())
    }
}

impl EloRatings {
    pub fn new(config: EloConfig) -> Self {
        EloRatings {
            ratings: BTreeMap::new(),
            config,
        }
    }

    /// Get current rating for a team (returns initial if unknown)
    pub fn rating(&self, team: &TeamId) -> f64 {
        self.ratings
            .get(team)
            .copied()
            .unwrap_or(self.config.initial_rating)
    }

    /// Expected score (0-1) of `team` against `opponent`
    pub fn expected_score(&self, team: &TeamId, opponent: &TeamId) -> f64 {
        expected_score(self.rating(team), self.rating(opponent))
    }

    /// Ratings both sides would hold after this match, without applying them
    pub fn rated_pair(&self, home: &TeamId, away: &TeamId, result: FullTimeResult) -> (f64, f64) {
        let home_rating = self.rating(home);
        let away_rating = self.rating(away);
        let k = self.config.k_factor;

        match result {
            FullTimeResult::HomeWin => {
                let delta = k * (1.0 - expected_score(home_rating, away_rating));
                (home_rating + delta, away_rating - delta)
            }
            FullTimeResult::AwayWin => {
                let delta = k * (1.0 - expected_score(away_rating, home_rating));
                (home_rating - delta, away_rating + delta)
            }
            FullTimeResult::Draw => {
                let delta = k * (0.5 - expected_score(home_rating, away_rating));
                (home_rating + delta, away_rating - delta)
            }
        }
    }

    /// Update ratings after a match (call AFTER reading pre-match ratings)
    pub fn update(&mut self, home: &TeamId, away: &TeamId, result: FullTimeResult) {
        let (home_new, away_new) = self.rated_pair(home, away, result);
        self.set(home.clone(), home_new);
        self.set(away.clone(), away_new);
    }

    pub(crate) fn set(&mut self, team: TeamId, rating: f64) {
        self.ratings.insert(team, rating);
    }

    pub fn config(&self) -> &EloConfig {
        &self.config
    }

    /// Rated teams, highest first
    pub fn leaderboard(&self) -> Vec<(&TeamId, f64)> {
        let mut table: Vec<_> = self.ratings.iter().map(|(t, r)| (t, *r)).collect();
        table.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        table
    }
}

/// E(A,B) = 1 / (1 + 10^((R_B - R_A) / 400))
pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent_rating - rating) / 400.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str) -> TeamId {
        TeamId::from(name)
    }

    #[test]
    fn test_initial_ratings() {
        let elo = EloRatings::default();
        assert_eq!(elo.rating(&team("Arsenal")), 1500.0);
        assert_eq!(elo.rating(&team("Anyone")), 1500.0);
    }

    #[test]
    fn test_expected_score_equal() {
        let elo = EloRatings::default();
        assert_eq!(elo.expected_score(&team("A"), &team("B")), 0.5);
        assert!((expected_score(1600.0, 1400.0) + expected_score(1400.0, 1600.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_home_win_from_equal() {
        let mut elo = EloRatings::default();
        elo.update(&team("A"), &team("B"), FullTimeResult::HomeWin);

        assert_eq!(elo.rating(&team("A")), 1516.0);
        assert_eq!(elo.rating(&team("B")), 1484.0);
    }

    #[test]
    fn test_away_win_from_equal() {
        let mut elo = EloRatings::default();
        elo.update(&team("A"), &team("B"), FullTimeResult::AwayWin);

        assert_eq!(elo.rating(&team("A")), 1484.0);
        assert_eq!(elo.rating(&team("B")), 1516.0);
    }

    #[test]
    fn test_decisive_zero_sum() {
        let mut elo = EloRatings::default();
        elo.set(team("Strong"), 1720.0);
        elo.set(team("Weak"), 1380.0);

        for result in [FullTimeResult::HomeWin, FullTimeResult::AwayWin] {
            let before_home = elo.rating(&team("Weak"));
            let before_away = elo.rating(&team("Strong"));
            let (home_new, away_new) = elo.rated_pair(&team("Weak"), &team("Strong"), result);
            let home_delta = home_new - before_home;
            let away_delta = away_new - before_away;
            assert!((home_delta + away_delta).abs() < 1e-9);
        }
    }

    #[test]
    fn test_upset_moves_more() {
        let mut elo = EloRatings::default();
        elo.set(team("Strong"), 1700.0);
        elo.set(team("Weak"), 1300.0);

        let (_, favourite_win) = elo.rated_pair(&team("Weak"), &team("Strong"), FullTimeResult::AwayWin);
        let (upset_win, _) = elo.rated_pair(&team("Weak"), &team("Strong"), FullTimeResult::HomeWin);

        assert!(favourite_win - 1700.0 < upset_win - 1300.0);
    }

    #[test]
    fn test_draw_between_equals_is_noop() {
        let mut elo = EloRatings::default();
        elo.update(&team("A"), &team("B"), FullTimeResult::Draw);

        assert_eq!(elo.rating(&team("A")), 1500.0);
        assert_eq!(elo.rating(&team("B")), 1500.0);
    }

    #[test]
    fn test_draw_pulls_ratings_together() {
        let mut elo = EloRatings::default();
        elo.set(team("Strong"), 1600.0);
        elo.set(team("Weak"), 1400.0);
        elo.update(&team("Strong"), &team("Weak"), FullTimeResult::Draw);

        let strong = elo.rating(&team("Strong"));
        let weak = elo.rating(&team("Weak"));
        assert!(strong < 1600.0);
        assert!(weak > 1400.0);
        assert!((strong - 1600.0 + weak - 1400.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_k_factor() {
        let mut elo = EloRatings::new(EloConfig {
            k_factor: 20.0,
            initial_rating: 1000.0,
        });
        elo.update(&team("A"), &team("B"), FullTimeResult::HomeWin);
        assert_eq!(elo.rating(&team("A")), 1010.0);
        assert_eq!(elo.rating(&team("B")), 990.0);
    }

    #[test]
    fn test_leaderboard() {
        let mut elo = EloRatings::default();
        elo.update(&team("A"), &team("B"), FullTimeResult::HomeWin);
        let table = elo.leaderboard();
        assert_eq!(table[0].0, &team("A"));
        assert_eq!(table[1].0, &team("B"));
    }
}
