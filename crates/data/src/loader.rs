//! CSV ingestion of historical results (`Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR`).

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use footy_models::{BookmakerOdds, FullTimeResult, MatchRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

// `%y` first: `%Y` would read `24` as year 24
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%y", "%d/%m/%Y"];

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "HomeTeam")]
    home_team: String,
    #[serde(rename = "AwayTeam")]
    away_team: String,
    #[serde(rename = "FTHG")]
    home_goals: String,
    #[serde(rename = "FTAG")]
    away_goals: String,
    #[serde(rename = "FTR")]
    result: String,
    #[serde(rename = "B365H", default)]
    odds_home: Option<String>,
    #[serde(rename = "B365D", default)]
    odds_draw: Option<String>,
    #[serde(rename = "B365A", default)]
    odds_away: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: usize,
    pub dropped: usize,
}

/// Reads a results file, falling back to Latin-1 when it is not valid UTF-8.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<MatchRecord>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    let (records, report) = parse_csv(&decode(&bytes))
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))?;
    info!(
        "📥 Loaded {} matches from {} ({} rows dropped)",
        report.rows,
        path.display(),
        report.dropped
    );
    Ok(records)
}

/// UTF-8 when valid, otherwise one char per byte.
pub fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            warn!("🔤 CSV is not valid UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

/// Parses CSV text, dropping rows that cannot be interpreted.
pub fn parse_csv(text: &str) -> Result<(Vec<MatchRecord>, LoadReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut report = LoadReport::default();
    for (line, row) in reader.deserialize::<RawRow>().enumerate() {
        // Header is line 1
        let line = line + 2;
        let parsed = row
            .map_err(anyhow::Error::from)
            .and_then(|raw| to_record(&raw));
        match parsed {
            Ok(record) => records.push(record),
            Err(e) => {
                report.dropped += 1;
                warn!("⚠️  Line {} dropped: {}", line, e);
            }
        }
    }

    report.rows = records.len();
    Ok((records, report))
}

fn to_record(raw: &RawRow) -> Result<MatchRecord> {
    if raw.home_team.is_empty() || raw.away_team.is_empty() {
        return Err(anyhow!("missing team name"));
    }
    let date = parse_date(&raw.date)?;
    let home_goals = parse_goals(&raw.home_goals).context("invalid FTHG")?;
    let away_goals = parse_goals(&raw.away_goals).context("invalid FTAG")?;
    let result = FullTimeResult::from_code(&raw.result)?;

    let record = MatchRecord::with_result(date, &raw.home_team, &raw.away_team, home_goals, away_goals, result);
    Ok(match parse_odds(raw) {
        Some(odds) => record.with_odds(odds),
        None => record,
    })
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    // Datetime stamps keep only their date part
    let date_part = value.split_whitespace().next().unwrap_or(value);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .ok_or_else(|| anyhow!("unparseable date '{value}'"))
}

/// Goal counts, accepting integral floats such as `2.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_goals(value: &str) -> Result<u8> {
    if let Ok(goals) = value.parse::<u8>() {
        return Ok(goals);
    }
    let goals: f64 = value.parse().with_context(|| format!("'{value}' is not a number"))?;
    if goals.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&goals) {
        return Err(anyhow!("'{value}' is not a goal count"));
    }
    Ok(goals as u8)
}

fn parse_odds(raw: &RawRow) -> Option<BookmakerOdds> {
    let price = |v: &Option<String>| v.as_deref().and_then(|s| Decimal::from_str(s).ok());
    Some(BookmakerOdds::new(
        price(&raw.odds_home)?,
        price(&raw.odds_draw)?,
        price(&raw.odds_away)?,
    ))
}

/// Distinct season labels, oldest first.
pub fn available_seasons(history: &[MatchRecord]) -> Vec<String> {
    history
        .iter()
        .map(|m| m.season.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct team names appearing on either side.
pub fn team_names(history: &[MatchRecord]) -> Vec<String> {
    history
        .iter()
        .flat_map(|m| [m.home_team.clone(), m.away_team.clone()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
