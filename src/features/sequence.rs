//! Chronological ordering of match records

use crate::MatchRecord;

/// A match together with its position in the processing order
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedMatch {
    /// 0-based position in date order
    pub index: usize,
    pub record: MatchRecord,
}

/// Order records by date ascending. Matches on the same date keep their input order.
pub fn sequence(mut records: Vec<MatchRecord>) -> Vec<SequencedMatch> {
    // sort_by_key is stable
    records.sort_by_key(|m| m.date);
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| SequencedMatch { index, record })
        .collect()
}
