use chrono::NaiveDate;
use footy_models::MatchRecord;

pub fn record(date: &str, home: &str, away: &str, home_goals: u8, away_goals: u8) -> MatchRecord {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    MatchRecord::new(date, home, away, home_goals, away_goals)
}
