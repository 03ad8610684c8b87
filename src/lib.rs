//! Football match feature engineering
//!
//! Derives leak-free pre-match features (rolling form, head-to-head, global
//! aggregates, Elo) from a chronological history of match results.

pub mod data;
pub mod features;
pub mod predict;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Team identifier as it appears in the source data
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(name: impl Into<String>) -> Self {
        TeamId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(name: &str) -> Self {
        TeamId(name.to_string())
    }
}

/// Full-time result (FTR)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FullTimeResult {
    HomeWin,
    Draw,
    AwayWin,
}

impl FullTimeResult {
    /// Single-letter code used by the source data
    pub fn code(&self) -> &'static str {
        match self {
            FullTimeResult::HomeWin => "H",
            FullTimeResult::Draw => "D",
            FullTimeResult::AwayWin => "A",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "H" => Some(FullTimeResult::HomeWin),
            "D" => Some(FullTimeResult::Draw),
            "A" => Some(FullTimeResult::AwayWin),
            _ => None,
        }
    }

    /// Result from the home team's point of view
    pub fn for_home(&self) -> TeamOutcome {
        match self {
            FullTimeResult::HomeWin => TeamOutcome::Win,
            FullTimeResult::Draw => TeamOutcome::Draw,
            FullTimeResult::AwayWin => TeamOutcome::Loss,
        }
    }

    /// Result from the away team's point of view
    pub fn for_away(&self) -> TeamOutcome {
        match self {
            FullTimeResult::HomeWin => TeamOutcome::Loss,
            FullTimeResult::Draw => TeamOutcome::Draw,
            FullTimeResult::AwayWin => TeamOutcome::Win,
        }
    }

    /// Class label as used by the classifier: away=0, draw=1, home=2
    pub fn class_index(&self) -> usize {
        match self {
            FullTimeResult::AwayWin => 0,
            FullTimeResult::Draw => 1,
            FullTimeResult::HomeWin => 2,
        }
    }

    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(FullTimeResult::AwayWin),
            1 => Some(FullTimeResult::Draw),
            2 => Some(FullTimeResult::HomeWin),
            _ => None,
        }
    }
}

impl fmt::Display for FullTimeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FullTimeResult::HomeWin => write!(f, "home_win"),
            FullTimeResult::Draw => write!(f, "draw"),
            FullTimeResult::AwayWin => write!(f, "away_win"),
        }
    }
}

/// Match result from one team's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamOutcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl TeamOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, TeamOutcome::Win)
    }
}

/// Per-match statistics. Missing values in the source default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub home_half_time_goals: f64,
    pub away_half_time_goals: f64,
    pub home_shots: f64,
    pub away_shots: f64,
    pub home_shots_on_target: f64,
    pub away_shots_on_target: f64,
    pub home_fouls: f64,
    pub away_fouls: f64,
    pub home_corners: f64,
    pub away_corners: f64,
    pub home_yellow_cards: f64,
    pub away_yellow_cards: f64,
    pub home_red_cards: f64,
    pub away_red_cards: f64,
}

/// Pre-match bookmaker odds (decimal)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Odds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

/// A single played match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    /// Season tag (usually the source file stem)
    pub season: Option<String>,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub result: FullTimeResult,
    pub home_goals: u8,
    pub away_goals: u8,
    pub stats: MatchStats,
    pub odds: Odds,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum FootballError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Match {home} vs {away} on {date} is earlier than the last processed match ({last})")]
    OutOfOrder {
        home: TeamId,
        away: TeamId,
        date: NaiveDate,
        last: NaiveDate,
    },

    #[error("No snapshot at {0} - run `football features` first")]
    NoSnapshot(String),

    #[error("Unknown team: {0}")]
    UnknownTeam(String),
}

pub type Result<T> = std::result::Result<T, FootballError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub elo: EloConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// Which per-side quantity rolling form and head-to-head treat as "scored"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    #[default]
    Goals,
    ShotsOnTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Trailing window for rolling form
    pub form_window: usize,
    /// Number of most recent meetings used for head-to-head
    pub h2h_window: usize,
    pub score_source: ScoreSource,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            form_window: 5,
            h2h_window: 5,
            score_source: ScoreSource::Goals,
        }
    }
}

/// Elo rating configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EloConfig {
    /// K-factor: how much ratings change per match
    pub k_factor: f64,
    /// Starting rating for new teams
    pub initial_rating: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        EloConfig {
            k_factor: 32.0,
            initial_rating: 1500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub database_path: String,
    pub snapshot_path: String,
    pub features_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            database_path: "data/football.db".to_string(),
            snapshot_path: "data/snapshot.json".to_string(),
            features_path: "data/features.csv".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FootballError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| FootballError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FootballError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
