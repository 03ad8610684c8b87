//! Prediction for upcoming fixtures
//!
//! Features come from a snapshot of the last full pass; the model itself is
//! supplied by the caller through [`Classifier`].

pub mod encoder;
pub mod inference;
pub mod snapshot;

pub use encoder::{LabelEncoder, TeamEncoder};
pub use inference::{format_prediction, Classifier, Fixture, Prediction, Predictor, INPUT_NAMES};
pub use snapshot::Snapshot;
