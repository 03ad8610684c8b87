//! Data ingestion, storage and export
//!
//! CSV season files in, SQLite match store, CSV feature table out.

pub mod database;
pub mod export;
pub mod ingest;

pub use database::Database;
pub use export::{write_features, write_features_file};
pub use ingest::{read_season_files, IngestReport};
