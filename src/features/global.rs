//! All-time scoring averages

use serde::{Deserialize, Serialize};

use super::ledger::HistoryEntry;

/// Goals averaged over a team's entire history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalAggregates {
    pub avg_scored: f64,
    pub avg_conceded: f64,
}

impl GlobalAggregates {
    /// Always computed from actual goals; zeros when empty
    pub fn compute(history: &[HistoryEntry]) -> Self {
        if history.is_empty() {
            return GlobalAggregates::default();
        }

        let n = history.len() as f64;
        GlobalAggregates {
            avg_scored: history.iter().map(|e| e.scored as f64).sum::<f64>() / n,
            avg_conceded: history.iter().map(|e| e.conceded as f64).sum::<f64>() / n,
        }
    }
}
