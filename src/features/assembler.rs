//! Sequential feature extraction over a match history

use super::row::FeatureRow;
use super::sequence::sequence;
use super::state::EngineState;
use crate::{Config, FeatureConfig, FootballError, MatchRecord, Result};

/// Owns the engine state for one processing pass and feeds matches through it
pub struct FeatureAssembler {
    state: EngineState,
    config: FeatureConfig,
}

impl FeatureAssembler {
    /// Start a fresh pass: empty ledger, default ratings
    pub fn new(config: &Config) -> Self {
        FeatureAssembler {
            state: EngineState::new(config.elo),
            config: config.features,
        }
    }

    /// Continue a pass from a checkpoint taken between matches
    pub fn resume(state: EngineState, config: FeatureConfig) -> Self {
        FeatureAssembler { state, config }
    }

    /// Process the next match: features from prior state, then commit its result.
    ///
    /// A match dated before the last processed one is rejected and leaves the
    /// state untouched.
    pub fn step(&mut self, record: MatchRecord) -> Result<FeatureRow> {
        self.check_order(&record)?;
        let index = self.state.position();
        Ok(self.commit_at(index, record))
    }

    fn check_order(&self, record: &MatchRecord) -> Result<()> {
        match self.state.last_date() {
            Some(last) if record.date < last => Err(FootballError::OutOfOrder {
                home: record.home_team.clone(),
                away: record.away_team.clone(),
                date: record.date,
                last,
            }),
            _ => Ok(()),
        }
    }

    /// Emit the row for `record` at sequence `index`, then commit it
    fn commit_at(&mut self, index: usize, record: MatchRecord) -> FeatureRow {
        debug_assert_eq!(index, self.state.position());
        let (row, commit) = {
            let view = self.state.view(&self.config);
            let commit = view.stage_commit(index, &record);
            (view.features(index, record), commit)
        };
        self.state.apply(commit);
        row
    }

    /// Order `records` by date and process all of them.
    ///
    /// Fails without committing anything if the batch starts before the last
    /// processed match.
    pub fn run(&mut self, records: Vec<MatchRecord>) -> Result<Vec<FeatureRow>> {
        let start = self.state.position();
        let ordered = sequence(records);
        let mut rows = Vec::with_capacity(ordered.len());

        // Sorted, so only the earliest record can precede a resumed checkpoint
        if let Some(first) = ordered.first() {
            self.check_order(&first.record)?;
        }

        for m in ordered {
            rows.push(self.commit_at(start + m.index, m.record));
        }

        log::info!(
            "Derived features for {} matches (positions {}..{}, {} teams)",
            rows.len(),
            start,
            self.state.position(),
            self.state.ledger().team_count()
        );
        Ok(rows)
    }

    /// Number of matches committed so far
    pub fn position(&self) -> usize {
        self.state.position()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Checkpoint of the state between matches, for [`FeatureAssembler::resume`]
    pub fn snapshot(&self) -> EngineState {
        self.state.clone()
    }

    /// Hand over the final state, e.g. to persist it as a snapshot
    pub fn into_state(self) -> EngineState {
        self.state
    }
}

/// Derive features for a full match history in one pass
pub fn derive_features(records: Vec<MatchRecord>, config: &Config) -> Result<(Vec<FeatureRow>, EngineState)> {
    let mut assembler = FeatureAssembler::new(config);
    let rows = assembler.run(records)?;
    Ok((rows, assembler.into_state()))
}
