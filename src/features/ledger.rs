//! Append-only per-team match history

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ScoreSource, TeamId, TeamOutcome};

/// One team's participation in one processed match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Sequence index of the match this entry was recorded from
    pub match_index: usize,
    pub opponent: TeamId,
    pub was_home: bool,
    /// Goals scored
    pub scored: u8,
    /// Goals conceded
    pub conceded: u8,
    pub shots_on_target_for: f64,
    pub shots_on_target_against: f64,
    pub outcome: TeamOutcome,
}

impl HistoryEntry {
    /// "Scored" under the given score source
    pub fn scored_by(&self, source: ScoreSource) -> f64 {
        match source {
            ScoreSource::Goals => self.scored as f64,
            ScoreSource::ShotsOnTarget => self.shots_on_target_for,
        }
    }

    /// "Conceded" under the given score source
    pub fn conceded_by(&self, source: ScoreSource) -> f64 {
        match source {
            ScoreSource::Goals => self.conceded as f64,
            ScoreSource::ShotsOnTarget => self.shots_on_target_against,
        }
    }
}

/// Per-team logs of past matches, in processing order.
///
/// Entries are only ever appended. The ledger has no deletion or
/// in-place update path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamLedger {
    histories: BTreeMap<TeamId, Vec<HistoryEntry>>,
}

impl TeamLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// History for a team so far (empty if never seen)
    pub fn history(&self, team: &TeamId) -> &[HistoryEntry] {
        self.histories
            .get(team)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn append(&mut self, team: TeamId, entry: HistoryEntry) {
        self.histories.entry(team).or_default().push(entry);
    }

    /// Number of teams with at least one entry
    pub fn team_count(&self) -> usize {
        self.histories.len()
    }

    /// Total number of entries across all teams
    pub fn entry_count(&self) -> usize {
        self.histories.values().map(|h| h.len()).sum()
    }

    pub fn teams(&self) -> impl Iterator<Item = &TeamId> {
        self.histories.keys()
    }
}
