//! Persisted engine state for point-in-time lookups

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::features::{EngineState, FeatureAssembler, PreMatchFeatures};
use crate::{FeatureConfig, FootballError, Result, TeamId};

/// Final ledger and ratings of a full pass, with the settings that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub features: FeatureConfig,
    pub state: EngineState,
}

impl Snapshot {
    pub fn new(features: FeatureConfig, state: EngineState) -> Self {
        Snapshot { features, state }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;

        log::info!(
            "Saved snapshot at position {} to {}",
            self.state.position(),
            path.display()
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FootballError::NoSnapshot(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        log::debug!(
            "Loaded snapshot: {} matches, {} teams",
            snapshot.state.position(),
            snapshot.state.ledger().team_count()
        );
        Ok(snapshot)
    }

    /// Pre-match features for a fixture played after every match in the snapshot.
    ///
    /// Unknown teams get empty history and the initial rating.
    pub fn lookup(&self, home: &TeamId, away: &TeamId) -> PreMatchFeatures {
        self.state.view(&self.features).pre_match(home, away)
    }

    pub fn knows(&self, team: &TeamId) -> bool {
        !self.state.ledger().history(team).is_empty()
    }

    pub fn teams(&self) -> impl Iterator<Item = &TeamId> {
        self.state.ledger().teams()
    }

    /// Continue the pass this snapshot was taken from
    pub fn into_assembler(self) -> FeatureAssembler {
        FeatureAssembler::resume(self.state, self.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::derive_features;
    use crate::features::test_support::make_match;
    use crate::Config;

    fn snapshot() -> Snapshot {
        let config = Config::default();
        let (_, state) = derive_features(
            vec![
                make_match("Leeds", "Wigan", 3, 0).on(2022, 1, 8),
                make_match("Wigan", "Leeds", 1, 1).on(2022, 1, 15),
            ],
            &config,
        )
        .unwrap();
        Snapshot::new(config.features, state)
    }

    #[test]
    fn test_lookup_uses_final_state() {
        let snap = snapshot();
        let features = snap.lookup(&TeamId::from("Leeds"), &TeamId::from("Wigan"));

        assert_eq!(features.home_form.avg_scored, 2.0);
        assert_eq!(features.home_form.win_rate, 0.5);
        assert_eq!(features.away_form.avg_conceded, 2.0);
        assert_eq!(features.head_to_head.meetings, 2);
        assert!(features.home_elo > 1500.0);
        assert!((features.home_elo + features.away_elo - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_lookup_unknown_team() {
        let snap = snapshot();
        let stranger = TeamId::from("Hull");
        let features = snap.lookup(&stranger, &TeamId::from("Leeds"));

        assert!(!snap.knows(&stranger));
        assert_eq!(features.home_elo, 1500.0);
        assert_eq!(features.home_form.win_rate, 0.0);
        assert_eq!(features.head_to_head.meetings, 0);
    }

    #[test]
    fn test_lookup_does_not_mutate() {
        let snap = snapshot();
        let before = snap.clone();
        snap.lookup(&TeamId::from("Leeds"), &TeamId::from("Wigan"));
        assert_eq!(snap, before);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshot.json");

        let snap = snapshot();
        snap.save(&path).unwrap();
        let loaded = Snapshot::load(&path).unwrap();

        assert_eq!(loaded, snap);
        assert_eq!(loaded.state.position(), 2);
        assert_eq!(loaded.teams().count(), 2);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, FootballError::NoSnapshot(_)));
    }

    #[test]
    fn test_resume_from_snapshot() {
        let snap = snapshot();
        let mut assembler = snap.into_assembler();
        let row = assembler
            .step(make_match("Leeds", "Wigan", 0, 2).on(2022, 2, 1))
            .unwrap();

        assert_eq!(row.match_index, 2);
        assert_eq!(row.features.head_to_head.meetings, 2);
        assert_eq!(assembler.position(), 3);
    }

    /// Several double round robins between six clubs, with plenty of draws
    fn long_league() -> Vec<crate::MatchRecord> {
        let clubs = ["Bolton", "Derby", "Hull", "Leeds", "Stoke", "Wigan"];
        let start = chrono::NaiveDate::from_ymd_opt(2015, 8, 1).unwrap();
        let mut records = Vec::new();
        for round in 0..12u32 {
            for (i, home) in clubs.iter().enumerate() {
                for (j, away) in clubs.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let seed = round * 7 + (i as u32) * 3 + (j as u32) * 5;
                    let mut record = make_match(home, away, (seed % 4) as u8, (seed / 3 % 3) as u8);
                    record.date = start + chrono::Duration::days((round * 30 + i as u32) as i64);
                    records.push(record);
                }
            }
        }
        records
    }

    #[test]
    fn test_save_and_load_preserves_ratings_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let config = Config::default();
        let records = long_league();
        let (head, tail) = records.split_at(300);

        let mut assembler = FeatureAssembler::new(&config);
        assembler.run(head.to_vec()).unwrap();
        let snap = Snapshot::new(config.features, assembler.snapshot());
        snap.save(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded, snap);
        for (team, rating) in snap.state.elo().leaderboard() {
            assert_eq!(loaded.state.elo().rating(team).to_bits(), rating.to_bits());
        }

        let mut resumed = loaded.into_assembler();
        let rows = resumed.run(tail.to_vec()).unwrap();
        let expected = assembler.run(tail.to_vec()).unwrap();
        assert_eq!(rows, expected);
    }
}
