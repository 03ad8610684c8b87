//! Season CSV ingestion
//!
//! Reads football-data style result files. Only the columns the feature
//! engine needs are kept. Rows without a usable date or result are dropped
//! here and never reach the engine.

use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::{FullTimeResult, MatchRecord, MatchStats, Odds, Result, TeamId};

/// Raw CSV row. Every field is optional; unknown columns are ignored.
#[derive(Debug, Default, Deserialize)]
struct RawRow {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "HomeTeam", default)]
    home_team: Option<String>,
    #[serde(rename = "AwayTeam", default)]
    away_team: Option<String>,
    #[serde(rename = "FTHG", alias = "HG", default)]
    home_goals: Option<String>,
    #[serde(rename = "FTAG", alias = "AG", default)]
    away_goals: Option<String>,
    #[serde(rename = "FTR", alias = "Res", default)]
    result: Option<String>,
    #[serde(rename = "HTHG", default)]
    hthg: Option<String>,
    #[serde(rename = "HTAG", default)]
    htag: Option<String>,
    #[serde(rename = "HS", default)]
    hs: Option<String>,
    #[serde(rename = "AS", default)]
    away_shots: Option<String>,
    #[serde(rename = "HST", default)]
    hst: Option<String>,
    #[serde(rename = "AST", default)]
    ast: Option<String>,
    #[serde(rename = "HF", default)]
    hf: Option<String>,
    #[serde(rename = "AF", default)]
    af: Option<String>,
    #[serde(rename = "HC", default)]
    hc: Option<String>,
    #[serde(rename = "AC", default)]
    ac: Option<String>,
    #[serde(rename = "HY", default)]
    hy: Option<String>,
    #[serde(rename = "AY", default)]
    ay: Option<String>,
    #[serde(rename = "HR", default)]
    hr: Option<String>,
    #[serde(rename = "AR", default)]
    ar: Option<String>,
    #[serde(rename = "B365H", default)]
    b365h: Option<String>,
    #[serde(rename = "B365D", default)]
    b365d: Option<String>,
    #[serde(rename = "B365A", default)]
    b365a: Option<String>,
}

/// Counts from one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub rows: usize,
    pub kept: usize,
    pub bad_date: usize,
    pub bad_result: usize,
    pub missing_team: usize,
    /// Home and away team are the same
    pub same_team: usize,
    /// Rows the CSV reader could not decode, e.g. invalid UTF-8
    pub bad_row: usize,
    /// Files that could not be read at all
    pub failed_files: usize,
}

impl IngestReport {
    fn merge(&mut self, other: IngestReport) {
        self.rows += other.rows;
        self.kept += other.kept;
        self.bad_date += other.bad_date;
        self.bad_result += other.bad_result;
        self.missing_team += other.missing_team;
        self.same_team += other.same_team;
        self.bad_row += other.bad_row;
        self.failed_files += other.failed_files;
    }

    pub fn dropped(&self) -> usize {
        self.rows - self.kept
    }
}

/// Parse a match date in any of the formats found in the source files
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.contains('-') {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    }

    // %Y happily accepts "19" as year 19, so pick the format by year width
    let year_len = raw.rsplit('/').next().map(|y| y.len()).unwrap_or(0);
    let format = if year_len == 2 { "%d/%m/%y" } else { "%d/%m/%Y" };
    NaiveDate::parse_from_str(raw, format).ok()
}

/// Missing or malformed numbers count as zero
fn number(field: &Option<String>) -> f64 {
    field
        .as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn goals(field: &Option<String>) -> u8 {
    number(field).clamp(0.0, u8::MAX as f64) as u8
}

fn team(field: &Option<String>) -> Option<TeamId> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(TeamId::from)
}

/// Read matches from any CSV source, tagging them with `season`
pub fn read_matches<R: Read>(reader: R, season: Option<&str>) -> Result<(Vec<MatchRecord>, IngestReport)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut report = IngestReport::default();
    let mut records = Vec::new();

    for (line, row) in csv_reader.deserialize::<RawRow>().enumerate() {
        report.rows += 1;
        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::debug!("Row {}: {}", line + 2, e);
                report.bad_row += 1;
                continue;
            }
        };

        let Some(date) = row.date.as_deref().and_then(parse_date) else {
            log::debug!("Row {}: unparseable date {:?}", line + 2, row.date);
            report.bad_date += 1;
            continue;
        };
        let Some(result) = row.result.as_deref().and_then(FullTimeResult::from_code) else {
            log::debug!("Row {}: unknown result {:?}", line + 2, row.result);
            report.bad_result += 1;
            continue;
        };
        let (Some(home_team), Some(away_team)) = (team(&row.home_team), team(&row.away_team)) else {
            log::debug!("Row {}: missing team name", line + 2);
            report.missing_team += 1;
            continue;
        };
        if home_team == away_team {
            log::debug!("Row {}: {} listed as both home and away", line + 2, home_team);
            report.same_team += 1;
            continue;
        }

        records.push(MatchRecord {
            date,
            season: season.map(str::to_string),
            home_team,
            away_team,
            result,
            home_goals: goals(&row.home_goals),
            away_goals: goals(&row.away_goals),
            stats: MatchStats {
                home_half_time_goals: number(&row.hthg),
                away_half_time_goals: number(&row.htag),
                home_shots: number(&row.hs),
                away_shots: number(&row.away_shots),
                home_shots_on_target: number(&row.hst),
                away_shots_on_target: number(&row.ast),
                home_fouls: number(&row.hf),
                away_fouls: number(&row.af),
                home_corners: number(&row.hc),
                away_corners: number(&row.ac),
                home_yellow_cards: number(&row.hy),
                away_yellow_cards: number(&row.ay),
                home_red_cards: number(&row.hr),
                away_red_cards: number(&row.ar),
            },
            odds: Odds {
                home: number(&row.b365h),
                draw: number(&row.b365d),
                away: number(&row.b365a),
            },
        });
        report.kept += 1;
    }

    Ok((records, report))
}

/// Read one season file; the season tag is the file stem
pub fn read_season_file<P: AsRef<Path>>(path: P) -> Result<(Vec<MatchRecord>, IngestReport)> {
    let path = path.as_ref();
    let season = path.file_stem().and_then(|s| s.to_str());
    let file = std::fs::File::open(path)?;
    let (records, report) = read_matches(file, season)?;

    log::debug!(
        "{}: {} rows, {} kept",
        path.display(),
        report.rows,
        report.kept
    );
    if report.dropped() > 0 {
        log::warn!(
            "{}: dropped {} rows ({} bad dates, {} bad results, {} missing teams, {} same teams, {} undecodable)",
            path.display(),
            report.dropped(),
            report.bad_date,
            report.bad_result,
            report.missing_team,
            report.same_team,
            report.bad_row
        );
    }

    Ok((records, report))
}

/// Read and combine several season files. A file that cannot be read is
/// skipped and counted in [`IngestReport::failed_files`].
pub fn read_season_files<P: AsRef<Path>>(paths: &[P]) -> Result<(Vec<MatchRecord>, IngestReport)> {
    let mut all = Vec::new();
    let mut total = IngestReport::default();

    for path in paths {
        match read_season_file(path) {
            Ok((records, report)) => {
                all.extend(records);
                total.merge(report);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.as_ref().display(), e);
                total.failed_files += 1;
            }
        }
    }

    log::info!(
        "Read {} matches from {} files ({} rows dropped, {} files failed)",
        total.kept,
        paths.len(),
        total.dropped(),
        total.failed_files
    );
    Ok((all, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR,HTHG,HTAG,Referee,HS,AS,HST,AST,HF,AF,HC,AC,HY,AY,HR,AR,B365H,B365D,B365A
E0,09/08/2019,Liverpool,Norwich,4,1,H,4,0,M Oliver,15,12,7,5,9,9,11,2,0,2,0,0,1.14,10,19
E0,10/08/19,West Ham,Man City,0,5,A,0,1,M Dean,5,14,3,9,6,13,1,1,2,2,0,0,12,6.5,1.22
E0,not a date,Burnley,Southampton,3,0,H,0,0,G Scott,10,11,4,3,11,8,2,7,2,1,0,0,2.62,3.2,2.75
E0,2019-08-11,Tottenham,Aston Villa,3,1,H,0,1,C Pawson,31,7,7,2,13,14,14,3,1,0,0,0,1.25,6.5,12
E0,11/08/2019,Leicester,Wolves,0,0,,0,0,A Marriner,,,,,,,,,,,,,,,
,,,,,,,,,,,,,,,,,,,,,,,,
";

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("09/08/2019"), NaiveDate::from_ymd_opt(2019, 8, 9));
        assert_eq!(parse_date("10/08/19"), NaiveDate::from_ymd_opt(2019, 8, 10));
        assert_eq!(parse_date("2019-08-11"), NaiveDate::from_ymd_opt(2019, 8, 11));
        assert_eq!(parse_date("31/02/2019"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_read_matches() {
        let (records, report) = read_matches(SAMPLE.as_bytes(), Some("2019-20")).unwrap();

        assert_eq!(report.rows, 6);
        assert_eq!(report.kept, 3);
        assert_eq!(report.bad_date, 2);
        assert_eq!(report.bad_result, 1);
        assert_eq!(report.dropped(), 3);

        let first = &records[0];
        assert_eq!(first.home_team, TeamId::from("Liverpool"));
        assert_eq!(first.result, FullTimeResult::HomeWin);
        assert_eq!((first.home_goals, first.away_goals), (4, 1));
        assert_eq!(first.stats.home_shots_on_target, 7.0);
        assert_eq!(first.stats.away_corners, 2.0);
        assert_eq!(first.odds.away, 19.0);
        assert_eq!(first.season.as_deref(), Some("2019-20"));

        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2019, 8, 10).unwrap());
        assert_eq!(records[2].away_team, TeamId::from("Aston Villa"));
    }

    #[test]
    fn test_missing_stats_default_to_zero() {
        let csv = "Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR,HS\n01/09/2020,A,B,1,1,D,n/a\n";
        let (records, report) = read_matches(csv.as_bytes(), None).unwrap();

        assert_eq!(report.kept, 1);
        assert_eq!(records[0].stats, MatchStats::default());
        assert_eq!(records[0].odds, Odds::default());
        assert_eq!(records[0].result, FullTimeResult::Draw);
        assert_eq!(records[0].season, None);
    }

    #[test]
    fn test_read_season_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("2018-19.csv");
        let second = dir.path().join("2019-20.csv");
        let mut f = std::fs::File::create(&first).unwrap();
        writeln!(f, "Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR").unwrap();
        writeln!(f, "10/08/2018,Man United,Leicester,2,1,H").unwrap();
        let mut f = std::fs::File::create(&second).unwrap();
        writeln!(f, "Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR").unwrap();
        writeln!(f, "09/08/2019,Liverpool,Norwich,4,1,H").unwrap();
        writeln!(f, "bad,Liverpool,Norwich,4,1,H").unwrap();

        let (records, report) = read_season_files(&[first, second]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(report.rows, 3);
        assert_eq!(report.bad_date, 1);
        assert_eq!(records[0].season.as_deref(), Some("2018-19"));
        assert_eq!(records[1].season.as_deref(), Some("2019-20"));
    }

    #[test]
    fn test_undecodable_row_is_dropped() {
        let mut csv = b"Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n".to_vec();
        csv.extend_from_slice(b"01/09/2020,Leeds,Fulham,2,1,H\n");
        csv.extend_from_slice(b"\xff\xfe/09/2020,Wolves,Spurs,0,0,D\n");
        csv.extend_from_slice(b"03/09/2020,Fulham,Leeds,0,3,A\n");

        let (records, report) = read_matches(csv.as_slice(), None).unwrap();
        assert_eq!(report.rows, 3);
        assert_eq!(report.kept, 2);
        assert_eq!(report.bad_row, 1);
        assert_eq!(report.dropped(), 1);
        assert_eq!(records[1].home_team, TeamId::from("Fulham"));
    }

    #[test]
    fn test_same_team_row_is_dropped() {
        let csv = "Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n01/09/2020,Leeds,Leeds,1,0,H\n02/09/2020,Leeds,Fulham,1,0,H\n";
        let (records, report) = read_matches(csv.as_bytes(), None).unwrap();
        assert_eq!(report.same_team, 1);
        assert_eq!(report.kept, 1);
        assert_eq!(records[0].away_team, TeamId::from("Fulham"));
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("2020-21.csv");
        let missing = dir.path().join("2021-22.csv");
        std::fs::write(&good, "Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n12/09/2020,Fulham,Arsenal,0,3,A\n").unwrap();

        let (records, report) = read_season_files(&[good, missing]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.kept, 1);
        assert_eq!(report.failed_files, 1);
        assert_eq!(records[0].season.as_deref(), Some("2020-21"));
    }
}
