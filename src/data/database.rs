//! SQLite storage for match results

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::path::Path;

use crate::{FootballError, FullTimeResult, MatchRecord, MatchStats, Odds, Result, TeamId};

/// Database connection and operations
pub struct Database {
    conn: Connection,
}

/// Summary of what the database holds
#[derive(Debug, Clone, Default)]
pub struct DatabaseStats {
    pub match_count: i64,
    pub team_count: i64,
    pub season_count: i64,
    pub earliest_match: Option<String>,
    pub latest_match: Option<String>,
}

const MATCH_COLUMNS: &str = "date, season, home_team, away_team, result, home_goals, away_goals,
    home_ht_goals, away_ht_goals, home_shots, away_shots, home_shots_on_target, away_shots_on_target,
    home_fouls, away_fouls, home_corners, away_corners, home_yellow, away_yellow, home_red, away_red,
    odds_home, odds_draw, odds_away";

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS matches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                season TEXT,
                home_team TEXT NOT NULL,
                away_team TEXT NOT NULL,
                result TEXT NOT NULL,
                home_goals INTEGER NOT NULL DEFAULT 0,
                away_goals INTEGER NOT NULL DEFAULT 0,
                home_ht_goals REAL NOT NULL DEFAULT 0,
                away_ht_goals REAL NOT NULL DEFAULT 0,
                home_shots REAL NOT NULL DEFAULT 0,
                away_shots REAL NOT NULL DEFAULT 0,
                home_shots_on_target REAL NOT NULL DEFAULT 0,
                away_shots_on_target REAL NOT NULL DEFAULT 0,
                home_fouls REAL NOT NULL DEFAULT 0,
                away_fouls REAL NOT NULL DEFAULT 0,
                home_corners REAL NOT NULL DEFAULT 0,
                away_corners REAL NOT NULL DEFAULT 0,
                home_yellow REAL NOT NULL DEFAULT 0,
                away_yellow REAL NOT NULL DEFAULT 0,
                home_red REAL NOT NULL DEFAULT 0,
                away_red REAL NOT NULL DEFAULT 0,
                odds_home REAL NOT NULL DEFAULT 0,
                odds_draw REAL NOT NULL DEFAULT 0,
                odds_away REAL NOT NULL DEFAULT 0,
                UNIQUE(date, home_team, away_team)
            );

            CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(date);
            "#,
        )?;
        Ok(())
    }

    /// Insert or update a match record.
    ///
    /// Updating keeps the original row id, so a re-import does not move a
    /// match relative to others on the same date.
    pub fn upsert_match(&self, record: &MatchRecord) -> Result<()> {
        let s = &record.stats;
        self.conn.execute(
            &format!(
                "INSERT INTO matches ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                         ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24)
                 ON CONFLICT(date, home_team, away_team) DO UPDATE SET
                    season = COALESCE(excluded.season, season),
                    result = excluded.result,
                    home_goals = excluded.home_goals,
                    away_goals = excluded.away_goals,
                    home_ht_goals = excluded.home_ht_goals,
                    away_ht_goals = excluded.away_ht_goals,
                    home_shots = excluded.home_shots,
                    away_shots = excluded.away_shots,
                    home_shots_on_target = excluded.home_shots_on_target,
                    away_shots_on_target = excluded.away_shots_on_target,
                    home_fouls = excluded.home_fouls,
                    away_fouls = excluded.away_fouls,
                    home_corners = excluded.home_corners,
                    away_corners = excluded.away_corners,
                    home_yellow = excluded.home_yellow,
                    away_yellow = excluded.away_yellow,
                    home_red = excluded.home_red,
                    away_red = excluded.away_red,
                    odds_home = excluded.odds_home,
                    odds_draw = excluded.odds_draw,
                    odds_away = excluded.odds_away",
                MATCH_COLUMNS
            ),
            params![
                record.date.format("%Y-%m-%d").to_string(),
                record.season,
                record.home_team.as_str(),
                record.away_team.as_str(),
                record.result.code(),
                record.home_goals,
                record.away_goals,
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
                record.odds.home,
                record.odds.draw,
                record.odds.away,
            ],
        )?;
        Ok(())
    }

    /// Insert multiple match records in one transaction
    pub fn upsert_matches(&self, records: &[MatchRecord]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for record in records {
            self.upsert_match(record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// All matches by date, ties in insertion order
    pub fn get_all_matches(&self) -> Result<Vec<MatchRecord>> {
        self.get_matches_query(
            &format!("SELECT {} FROM matches ORDER BY date, id", MATCH_COLUMNS),
            [],
        )
    }

    /// Matches strictly before a given date
    pub fn get_matches_before(&self, date: NaiveDate) -> Result<Vec<MatchRecord>> {
        self.get_matches_query(
            &format!(
                "SELECT {} FROM matches WHERE date < ?1 ORDER BY date, id",
                MATCH_COLUMNS
            ),
            params![date.format("%Y-%m-%d").to_string()],
        )
    }

    /// Every team name that appears in the store, sorted
    pub fn get_team_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT home_team FROM matches UNION SELECT away_team FROM matches ORDER BY 1",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn get_matches_query<P: rusqlite::Params>(&self, query: &str, params: P) -> Result<Vec<MatchRecord>> {
        let mut stmt = self.conn.prepare(query)?;
        let matches = stmt
            .query_map(params, Self::row_to_match)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(matches)
    }

    fn row_to_match(row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
        let date_str: String = row.get(0)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let result_code: String = row.get(4)?;
        let result = FullTimeResult::from_code(&result_code).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(FootballError::Parse(format!("unknown result code: {}", result_code))),
            )
        })?;

        Ok(MatchRecord {
            date,
            season: row.get(1)?,
            home_team: TeamId(row.get(2)?),
            away_team: TeamId(row.get(3)?),
            result,
            home_goals: row.get(5)?,
            away_goals: row.get(6)?,
            stats: MatchStats {
                home_half_time_goals: row.get(7)?,
                away_half_time_goals: row.get(8)?,
                home_shots: row.get(9)?,
                away_shots: row.get(10)?,
                home_shots_on_target: row.get(11)?,
                away_shots_on_target: row.get(12)?,
                home_fouls: row.get(13)?,
                away_fouls: row.get(14)?,
                home_corners: row.get(15)?,
                away_corners: row.get(16)?,
                home_yellow_cards: row.get(17)?,
                away_yellow_cards: row.get(18)?,
                home_red_cards: row.get(19)?,
                away_red_cards: row.get(20)?,
            },
            odds: Odds {
                home: row.get(21)?,
                draw: row.get(22)?,
                away: row.get(23)?,
            },
        })
    }

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let match_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))?;
        let team_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM (SELECT home_team FROM matches UNION SELECT away_team FROM matches)",
            [],
            |row| row.get(0),
        )?;
        let season_count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT season) FROM matches",
            [],
            |row| row.get(0),
        )?;
        let (earliest_match, latest_match): (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(date), MAX(date) FROM matches",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(DatabaseStats {
            match_count,
            team_count,
            season_count,
            earliest_match,
            latest_match,
        })
    }
}
