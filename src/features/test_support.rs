use chrono::NaiveDate;

use crate::{FullTimeResult, MatchRecord, MatchStats, Odds, TeamId};

/// Match on 2024-01-01 with the result implied by the score
pub fn make_match(home: &str, away: &str, home_goals: u8, away_goals: u8) -> MatchRecord {
    let result = match home_goals.cmp(&away_goals) {
        std::cmp::Ordering::Greater => FullTimeResult::HomeWin,
        std::cmp::Ordering::Less => FullTimeResult::AwayWin,
        std::cmp::Ordering::Equal => FullTimeResult::Draw,
    };
    MatchRecord {
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        season: None,
        home_team: TeamId::from(home),
        away_team: TeamId::from(away),
        result,
        home_goals,
        away_goals,
        stats: MatchStats::default(),
        odds: Odds::default(),
    }
}

impl MatchRecord {
    pub fn on(mut self, year: i32, month: u32, day: u32) -> Self {
        self.date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        self
    }
}
