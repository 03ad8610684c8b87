//! Temporal feature derivation
//!
//! Turns a chronological match history into leak-free pre-match features.

pub mod assembler;
pub mod elo;
pub mod form;
pub mod global;
pub mod head_to_head;
pub mod ledger;
pub mod row;
pub mod sequence;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use assembler::{derive_features, FeatureAssembler};
pub use elo::EloRatings;
pub use form::RollingForm;
pub use global::GlobalAggregates;
pub use head_to_head::HeadToHead;
pub use ledger::{HistoryEntry, TeamLedger};
pub use row::{FeatureRow, PreMatchFeatures, FEATURE_NAMES};
pub use sequence::{sequence, SequencedMatch};
pub use state::{EngineState, MatchCommit, StateView};
