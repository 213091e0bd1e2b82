use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{FootyError, Result};
use crate::odds::BookmakerOdds;

/// Full-time result code as found in the `FTR` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FullTimeResult {
    Home,
    Draw,
    Away,
}

impl FullTimeResult {
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim() {
            "H" => Ok(Self::Home),
            "D" => Ok(Self::Draw),
            "A" => Ok(Self::Away),
            other => Err(FootyError::InvalidRecord(format!("unknown result code '{other}'"))),
        }
    }

    pub fn from_goals(home_goals: u8, away_goals: u8) -> Self {
        match home_goals.cmp(&away_goals) {
            std::cmp::Ordering::Greater => Self::Home,
            std::cmp::Ordering::Less => Self::Away,
            std::cmp::Ordering::Equal => Self::Draw,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Home => 'H',
            Self::Draw => 'D',
            Self::Away => 'A',
        }
    }
}

/// Season label for a match date. Seasons run July to June, so
/// 2023-08-12 belongs to `2023-2024` and 2024-03-02 to `2023-2024` too.
pub fn season_label(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= 7 {
        format!("{}-{}", year, year + 1)
    } else {
        format!("{}-{}", year - 1, year)
    }
}

/// One historical match row. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u8,
    pub away_goals: u8,
    pub result: FullTimeResult,
    pub season: String,
    pub odds: Option<BookmakerOdds>,
}

impl MatchRecord {
    /// Builds a record whose result code is derived from the score.
    pub fn new(
        date: NaiveDate,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_goals: u8,
        away_goals: u8,
    ) -> Self {
        Self::with_result(
            date,
            home_team,
            away_team,
            home_goals,
            away_goals,
            FullTimeResult::from_goals(home_goals, away_goals),
        )
    }

    /// Builds a record trusting the supplied result code, as the source data does.
    pub fn with_result(
        date: NaiveDate,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_goals: u8,
        away_goals: u8,
        result: FullTimeResult,
    ) -> Self {
        Self {
            date,
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals,
            away_goals,
            result,
            season: season_label(date),
            odds: None,
        }
    }

    pub fn with_odds(mut self, odds: BookmakerOdds) -> Self {
        self.odds = Some(odds);
        self
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// True when the match was played between the two teams, on either venue.
    pub fn is_between(&self, team_a: &str, team_b: &str) -> bool {
        (self.home_team == team_a && self.away_team == team_b)
            || (self.home_team == team_b && self.away_team == team_a)
    }

    /// Goals (for, against) from the point of view of `team`.
    pub fn goals_for(&self, team: &str) -> (u8, u8) {
        if self.home_team == team {
            (self.home_goals, self.away_goals)
        } else {
            (self.away_goals, self.home_goals)
        }
    }
}
