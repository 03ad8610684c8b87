//! Per-match feature row

use serde::{Deserialize, Serialize};

use super::form::RollingForm;
use super::global::GlobalAggregates;
use super::head_to_head::HeadToHead;
use crate::MatchRecord;

/// Engineered feature names, in the order of [`PreMatchFeatures::values`]
pub const FEATURE_NAMES: [&str; PreMatchFeatures::DIM] = [
    "HomeTeam_AvgGoalsScoredLast5",
    "HomeTeam_AvgGoalsConcededLast5",
    "HomeTeam_WinRateLast5",
    "AwayTeam_AvgGoalsScoredLast5",
    "AwayTeam_AvgGoalsConcededLast5",
    "AwayTeam_WinRateLast5",
    "HeadToHead_HomeWinRate",
    "HeadToHead_AwayWinRate",
    "HeadToHead_HomeGoals",
    "HeadToHead_AwayGoals",
    "HomeTeam_GlobalAvgGoalsScored",
    "HomeTeam_GlobalAvgGoalsConceded",
    "AwayTeam_GlobalAvgGoalsScored",
    "AwayTeam_GlobalAvgGoalsConceded",
    "HomeTeam_Elo",
    "AwayTeam_Elo",
];

/// Everything known about a fixture before kick-off
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PreMatchFeatures {
    pub home_form: RollingForm,
    pub away_form: RollingForm,
    pub head_to_head: HeadToHead,
    pub home_global: GlobalAggregates,
    pub away_global: GlobalAggregates,
    pub home_elo: f64,
    pub away_elo: f64,
}

impl PreMatchFeatures {
    /// Number of engineered features
    pub const DIM: usize = 16;

    pub fn values(&self) -> [f64; Self::DIM] {
        [
            // Rolling form (6)
            self.home_form.avg_scored,
            self.home_form.avg_conceded,
            self.home_form.win_rate,
            self.away_form.avg_scored,
            self.away_form.avg_conceded,
            self.away_form.win_rate,
            // Head-to-head (4)
            self.head_to_head.home_win_rate,
            self.head_to_head.away_win_rate,
            self.head_to_head.home_goals,
            self.head_to_head.away_goals,
            // Global (4)
            self.home_global.avg_scored,
            self.home_global.avg_conceded,
            self.away_global.avg_scored,
            self.away_global.avg_conceded,
            // Elo (2)
            self.home_elo,
            self.away_elo,
        ]
    }

    /// Features as (name, value) pairs
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES.iter().copied().zip(self.values()).collect()
    }
}

/// Output for one processed match: its features plus the raw record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Sequence index of the match
    pub match_index: usize,
    /// The match itself, passed through unchanged
    pub record: MatchRecord,
    pub features: PreMatchFeatures,
}

impl FeatureRow {
    pub fn engineered_values(&self) -> [f64; PreMatchFeatures::DIM] {
        self.features.values()
    }
}
