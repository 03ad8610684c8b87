//! Classifier input assembly and prediction

use serde::{Deserialize, Serialize};

use super::encoder::{LabelEncoder, TeamEncoder};
use super::snapshot::Snapshot;
use crate::features::{PreMatchFeatures, FEATURE_NAMES};
use crate::{FootballError, FullTimeResult, Odds, Result, TeamId};

/// Length of the classifier input vector
pub const INPUT_DIM: usize = 5 + PreMatchFeatures::DIM;

/// Classifier input columns: encoded teams, odds, then the engineered features
pub const INPUT_NAMES: [&str; INPUT_DIM] = [
    "HomeTeam",
    "AwayTeam",
    "B365H",
    "B365D",
    "B365A",
    FEATURE_NAMES[0],
    FEATURE_NAMES[1],
    FEATURE_NAMES[2],
    FEATURE_NAMES[3],
    FEATURE_NAMES[4],
    FEATURE_NAMES[5],
    FEATURE_NAMES[6],
    FEATURE_NAMES[7],
    FEATURE_NAMES[8],
    FEATURE_NAMES[9],
    FEATURE_NAMES[10],
    FEATURE_NAMES[11],
    FEATURE_NAMES[12],
    FEATURE_NAMES[13],
    FEATURE_NAMES[14],
    FEATURE_NAMES[15],
];

/// Class label with per-class probabilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: FullTimeResult,
    /// Indexed by [`FullTimeResult::class_index`]
    pub probabilities: [f64; 3],
}

impl Prediction {
    /// Label is the most probable class
    pub fn from_probabilities(probabilities: [f64; 3]) -> Self {
        let best = probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(FullTimeResult::HomeWin.class_index());
        Prediction {
            label: FullTimeResult::from_class_index(best).unwrap_or(FullTimeResult::HomeWin),
            probabilities,
        }
    }

    pub fn probability(&self, result: FullTimeResult) -> f64 {
        self.probabilities[result.class_index()]
    }
}

/// A trained outcome model
pub trait Classifier {
    fn predict(&self, input: &[f64]) -> Result<Prediction>;
}

/// An upcoming match to predict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub home_team: TeamId,
    pub away_team: TeamId,
    #[serde(default)]
    pub odds: Odds,
}

impl Fixture {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Fixture {
            home_team: TeamId::new(home),
            away_team: TeamId::new(away),
            odds: Odds::default(),
        }
    }

    pub fn with_odds(mut self, odds: Odds) -> Self {
        self.odds = odds;
        self
    }
}

/// Predicts fixtures from a snapshot, a team encoder and a classifier
pub struct Predictor<C, E = LabelEncoder> {
    snapshot: Snapshot,
    encoder: E,
    classifier: C,
}

impl<C: Classifier> Predictor<C, LabelEncoder> {
    /// Encoder fitted on every team in the snapshot
    pub fn new(snapshot: Snapshot, classifier: C) -> Self {
        let encoder = LabelEncoder::fit(snapshot.teams().cloned());
        Predictor {
            snapshot,
            encoder,
            classifier,
        }
    }
}

impl<C: Classifier, E: TeamEncoder> Predictor<C, E> {
    pub fn with_encoder(snapshot: Snapshot, encoder: E, classifier: C) -> Self {
        Predictor {
            snapshot,
            encoder,
            classifier,
        }
    }

    /// Classifier input for `fixture`, laid out as [`INPUT_NAMES`]
    pub fn input(&self, fixture: &Fixture) -> Result<[f64; INPUT_DIM]> {
        let home_code = self.code(&fixture.home_team)?;
        let away_code = self.code(&fixture.away_team)?;
        let features = self.snapshot.lookup(&fixture.home_team, &fixture.away_team);

        let mut input = [0.0; INPUT_DIM];
        input[0] = home_code as f64;
        input[1] = away_code as f64;
        input[2] = fixture.odds.home;
        input[3] = fixture.odds.draw;
        input[4] = fixture.odds.away;
        input[5..].copy_from_slice(&features.values());
        Ok(input)
    }

    pub fn predict(&self, fixture: &Fixture) -> Result<Prediction> {
        let input = self.input(fixture)?;
        self.classifier.predict(&input)
    }

    pub fn predict_batch(&self, fixtures: &[Fixture]) -> Vec<Result<Prediction>> {
        fixtures.iter().map(|f| self.predict(f)).collect()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn code(&self, team: &TeamId) -> Result<u32> {
        self.encoder
            .encode(team)
            .ok_or_else(|| FootballError::UnknownTeam(team.to_string()))
    }
}

/// Format a prediction for display
pub fn format_prediction(pred: &Prediction, fixture: &Fixture) -> String {
    let label = match pred.label {
        FullTimeResult::HomeWin => fixture.home_team.as_str(),
        FullTimeResult::AwayWin => fixture.away_team.as_str(),
        FullTimeResult::Draw => "Draw",
    };

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {} vs {}
├─────────────────────────────────────────────────┤
│  Predicted:  {} ({:.1}%)
│  Home win:   {:.1}%
│  Draw:       {:.1}%
│  Away win:   {:.1}%
└─────────────────────────────────────────────────┘
"#,
        fixture.home_team,
        fixture.away_team,
        label,
        pred.probability(pred.label) * 100.0,
        pred.probability(FullTimeResult::HomeWin) * 100.0,
        pred.probability(FullTimeResult::Draw) * 100.0,
        pred.probability(FullTimeResult::AwayWin) * 100.0,
    )
}
