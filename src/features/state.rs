//! Engine state and the read/commit split over it
//!
//! Features are computed through a [`StateView`], which only borrows the
//! ledger and ratings. The outcome of a match is staged into a
//! [`MatchCommit`] from the same view and applied with
//! [`EngineState::apply`], the only code path that mutates state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::elo::EloRatings;
use super::form::RollingForm;
use super::global::GlobalAggregates;
use super::head_to_head::HeadToHead;
use super::ledger::{HistoryEntry, TeamLedger};
use super::row::{FeatureRow, PreMatchFeatures};
use crate::{EloConfig, FeatureConfig, MatchRecord, TeamId};

/// Ledger and ratings as of some point in the match sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    ledger: TeamLedger,
    elo: EloRatings,
    /// Number of matches committed so far
    position: usize,
    last_date: Option<NaiveDate>,
}

impl EngineState {
    pub fn new(elo_config: EloConfig) -> Self {
        EngineState {
            ledger: TeamLedger::new(),
            elo: EloRatings::new(elo_config),
            position: 0,
            last_date: None,
        }
    }

    /// Read-only view for feature computation
    pub fn view<'a>(&'a self, config: &'a FeatureConfig) -> StateView<'a> {
        StateView {
            ledger: &self.ledger,
            elo: &self.elo,
            config,
        }
    }

    /// Commit one match. Infallible, so a match is either fully recorded or not at all.
    pub fn apply(&mut self, commit: MatchCommit) {
        let MatchCommit {
            date,
            home_team,
            home_entry,
            home_rating,
            away_team,
            away_entry,
            away_rating,
        } = commit;

        self.ledger.append(home_team.clone(), home_entry);
        self.ledger.append(away_team.clone(), away_entry);
        self.elo.set(home_team, home_rating);
        self.elo.set(away_team, away_rating);
        self.position += 1;
        self.last_date = Some(date);
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }

    pub fn ledger(&self) -> &TeamLedger {
        &self.ledger
    }

    pub fn elo(&self) -> &EloRatings {
        &self.elo
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new(EloConfig::default())
    }
}

/// Borrowed, immutable view of the engine state
#[derive(Clone, Copy)]
pub struct StateView<'a> {
    ledger: &'a TeamLedger,
    elo: &'a EloRatings,
    config: &'a FeatureConfig,
}

impl<'a> StateView<'a> {
    pub fn history(&self, team: &TeamId) -> &'a [HistoryEntry] {
        self.ledger.history(team)
    }

    pub fn rating(&self, team: &TeamId) -> f64 {
        self.elo.rating(team)
    }

    /// Features for a fixture between `home` and `away` from the state this view borrows
    pub fn pre_match(&self, home: &TeamId, away: &TeamId) -> PreMatchFeatures {
        let home_elo = self.rating(home);
        let away_elo = self.rating(away);

        let home_history = self.history(home);
        let away_history = self.history(away);

        let window = self.config.form_window;
        let source = self.config.score_source;

        PreMatchFeatures {
            home_form: RollingForm::compute(home_history, window, source),
            away_form: RollingForm::compute(away_history, window, source),
            head_to_head: HeadToHead::compute(
                home,
                home_history,
                away,
                away_history,
                self.config.h2h_window,
                source,
            ),
            home_global: GlobalAggregates::compute(home_history),
            away_global: GlobalAggregates::compute(away_history),
            home_elo,
            away_elo,
        }
    }

    /// Feature row for `record`, which must not be committed yet
    pub fn features(&self, match_index: usize, record: MatchRecord) -> FeatureRow {
        let features = self.pre_match(&record.home_team, &record.away_team);
        FeatureRow {
            match_index,
            record,
            features,
        }
    }

    /// Stage everything a played match changes, without changing anything yet
    pub fn stage_commit(&self, match_index: usize, record: &MatchRecord) -> MatchCommit {
        let (home_rating, away_rating) =
            self.elo
                .rated_pair(&record.home_team, &record.away_team, record.result);

        let home_entry = HistoryEntry {
            match_index,
            opponent: record.away_team.clone(),
            was_home: true,
            scored: record.home_goals,
            conceded: record.away_goals,
            shots_on_target_for: record.stats.home_shots_on_target,
            shots_on_target_against: record.stats.away_shots_on_target,
            outcome: record.result.for_home(),
        };
        let away_entry = HistoryEntry {
            match_index,
            opponent: record.home_team.clone(),
            was_home: false,
            scored: record.away_goals,
            conceded: record.home_goals,
            shots_on_target_for: record.stats.away_shots_on_target,
            shots_on_target_against: record.stats.home_shots_on_target,
            outcome: record.result.for_away(),
        };

        MatchCommit {
            date: record.date,
            home_team: record.home_team.clone(),
            home_entry,
            home_rating,
            away_team: record.away_team.clone(),
            away_entry,
            away_rating,
        }
    }
}

/// Every state change caused by one match, applied as a unit
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCommit {
    date: NaiveDate,
    home_team: TeamId,
    home_entry: HistoryEntry,
    home_rating: f64,
    away_team: TeamId,
    away_entry: HistoryEntry,
    away_rating: f64,
}
