//! Feature table export

use std::io::Write;
use std::path::Path;

use crate::features::{FeatureRow, FEATURE_NAMES};
use crate::Result;

/// Raw covariate columns written ahead of the engineered features
pub const COVARIATE_NAMES: [&str; 24] = [
    "Date", "Season", "HomeTeam", "AwayTeam", "FTHG", "FTAG", "FTR", "HTHG", "HTAG", "HS", "AS",
    "HST", "AST", "HF", "AF", "HC", "AC", "HY", "AY", "HR", "AR", "B365H", "B365D", "B365A",
];

fn covariates(row: &FeatureRow) -> Vec<String> {
    let m = &row.record;
    let s = &m.stats;
    let mut fields = vec![
        m.date.format("%Y-%m-%d").to_string(),
        m.season.clone().unwrap_or_default(),
        m.home_team.to_string(),
        m.away_team.to_string(),
        m.home_goals.to_string(),
        m.away_goals.to_string(),
        m.result.code().to_string(),
    ];
    fields.extend(
        [
            s.home_half_time_goals,
            s.away_half_time_goals,
            s.home_shots,
            s.away_shots,
            s.home_shots_on_target,
            s.away_shots_on_target,
            s.home_fouls,
            s.away_fouls,
            s.home_corners,
            s.away_corners,
            s.home_yellow_cards,
            s.away_yellow_cards,
            s.home_red_cards,
            s.away_red_cards,
            m.odds.home,
            m.odds.draw,
            m.odds.away,
        ]
        .iter()
        .map(|v| v.to_string()),
    );
    fields
}

/// Write feature rows as CSV: covariates first, then engineered features
pub fn write_features<W: Write>(writer: W, rows: &[FeatureRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let header: Vec<&str> = COVARIATE_NAMES
        .iter()
        .chain(FEATURE_NAMES.iter())
        .copied()
        .collect();
    csv_writer.write_record(&header)?;

    for row in rows {
        let mut fields = covariates(row);
        fields.extend(row.engineered_values().iter().map(|v| v.to_string()));
        csv_writer.write_record(&fields)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write feature rows to a file, creating parent directories as needed
pub fn write_features_file<P: AsRef<Path>>(path: P, rows: &[FeatureRow]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_features(file, rows)?;
    log::info!("Wrote {} feature rows to {}", rows.len(), path.display());
    Ok(())
}
