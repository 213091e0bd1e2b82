//! Model probabilities set against the bookmaker's recent prices for a fixture.

use std::cmp::Reverse;

use footy_models::{BookmakerOdds, MatchPrediction, MatchRecord, OutcomeProbabilities, PredictedOutcome, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_ODDS_LOOKBACK: usize = 5;
/// Percentage points the model must exceed the bookmaker by on a win.
pub const WIN_VALUE_EDGE: f64 = 5.0;
/// Same for the draw.
pub const DRAW_VALUE_EDGE: f64 = 3.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OddsComparison {
    pub home_team: String,
    pub away_team: String,
    /// Meetings between the two teams on record, either venue.
    pub meetings: usize,
    /// Meetings among the most recent ones that carried odds.
    pub priced_meetings: usize,
    /// Mean odds oriented to the requested venue.
    pub average_odds: Option<BookmakerOdds>,
    pub bookmaker: Option<OutcomeProbabilities>,
    pub model: OutcomeProbabilities,
    pub value_outcomes: Vec<PredictedOutcome>,
}

/// Mean odds over the last `lookback` meetings of the pair that carry odds.
///
/// Meetings played on the reverse venue have their home and away prices
/// swapped so every quote reads from `home_team`'s side.
pub fn average_recent_odds(
    history: &[MatchRecord],
    home_team: &str,
    away_team: &str,
    lookback: usize,
) -> (usize, usize, Option<BookmakerOdds>) {
    let mut meetings: Vec<&MatchRecord> = history
        .iter()
        .filter(|m| m.is_between(home_team, away_team))
        .collect();
    meetings.sort_by_key(|m| Reverse(m.date));
    let total = meetings.len();

    let priced: Vec<BookmakerOdds> = meetings
        .into_iter()
        .take(lookback)
        .filter_map(|m| {
            m.odds.map(|odds| {
                if m.home_team == home_team {
                    odds
                } else {
                    BookmakerOdds::new(odds.away_win, odds.draw, odds.home_win)
                }
            })
        })
        .collect();

    if priced.is_empty() {
        return (total, 0, None);
    }

    let count = Decimal::from(priced.len());
    let mean = |pick: fn(&BookmakerOdds) -> Decimal| {
        (priced.iter().map(pick).sum::<Decimal>() / count).round_dp(2)
    };
    let average = BookmakerOdds::new(mean(|o| o.home_win), mean(|o| o.draw), mean(|o| o.away_win));
    (total, priced.len(), Some(average))
}

/// Flags outcomes the model rates clearly above the bookmaker's implied price.
pub fn value_outcomes(model: &OutcomeProbabilities, bookmaker: &OutcomeProbabilities) -> Vec<PredictedOutcome> {
    let mut flagged = Vec::new();
    if model.home_win > bookmaker.home_win + WIN_VALUE_EDGE {
        flagged.push(PredictedOutcome::HomeWin);
    }
    if model.draw > bookmaker.draw + DRAW_VALUE_EDGE {
        flagged.push(PredictedOutcome::Draw);
    }
    if model.away_win > bookmaker.away_win + WIN_VALUE_EDGE {
        flagged.push(PredictedOutcome::AwayWin);
    }
    flagged
}

/// Compares a prediction with the recent odds for the same fixture.
pub fn compare_with_bookmaker(
    prediction: &MatchPrediction,
    history: &[MatchRecord],
    lookback: usize,
) -> Result<OddsComparison> {
    let (meetings, priced_meetings, average_odds) =
        average_recent_odds(history, &prediction.home_team, &prediction.away_team, lookback);

    let bookmaker = average_odds
        .as_ref()
        .map(BookmakerOdds::implied_probabilities)
        .transpose()?;
    let value_outcomes = bookmaker
        .as_ref()
        .map(|b| value_outcomes(&prediction.probabilities, b))
        .unwrap_or_default();

    debug!(
        "💰 {} vs {}: {} priced meetings, {} value outcome(s)",
        prediction.home_team,
        prediction.away_team,
        priced_meetings,
        value_outcomes.len()
    );

    Ok(OddsComparison {
        home_team: prediction.home_team.clone(),
        away_team: prediction.away_team.clone(),
        meetings,
        priced_meetings,
        average_odds,
        bookmaker,
        model: prediction.probabilities,
        value_outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;
    use footy_models::PredictionMethod;
    use rust_decimal_macros::dec;

    fn priced(date: &str, home: &str, away: &str, odds: BookmakerOdds) -> MatchRecord {
        record(date, home, away, 1, 0).with_odds(odds)
    }

    fn prediction(probabilities: OutcomeProbabilities) -> MatchPrediction {
        MatchPrediction {
            home_team: "Genk".to_string(),
            away_team: "Gent".to_string(),
            expected_home_goals: 1.6,
            expected_away_goals: 1.1,
            confidence: 70.0,
            probabilities,
            method: PredictionMethod::Ensemble,
            breakdown: None,
        }
    }

    #[test]
    fn test_reverse_venue_odds_are_swapped() {
        let history = vec![
            priced("2023-08-01", "Genk", "Gent", BookmakerOdds::new(dec!(2.00), dec!(3.40), dec!(3.80))),
            priced("2023-12-01", "Gent", "Genk", BookmakerOdds::new(dec!(3.00), dec!(3.20), dec!(2.40))),
            record("2024-02-01", "Genk", "Union", 2, 2),
        ];

        let (meetings, priced_meetings, odds) = average_recent_odds(&history, "Genk", "Gent", 5);
        assert_eq!(meetings, 2);
        assert_eq!(priced_meetings, 2);
        assert_eq!(odds, Some(BookmakerOdds::new(dec!(2.20), dec!(3.30), dec!(3.40))));
    }

    #[test]
    fn test_lookback_keeps_the_latest_meetings() {
        let history = vec![
            priced("2020-08-01", "Genk", "Gent", BookmakerOdds::new(dec!(9.00), dec!(9.00), dec!(1.10))),
            priced("2023-08-01", "Genk", "Gent", BookmakerOdds::new(dec!(1.80), dec!(3.50), dec!(4.50))),
            record("2024-01-01", "Genk", "Gent", 0, 0),
        ];

        let (meetings, priced_meetings, odds) = average_recent_odds(&history, "Genk", "Gent", 2);
        assert_eq!(meetings, 3);
        assert_eq!(priced_meetings, 1);
        assert_eq!(odds.map(|o| o.home_win), Some(dec!(1.80)));
    }

    #[test]
    fn test_value_edges() {
        let bookmaker = OutcomeProbabilities { home_win: 40.0, draw: 30.0, away_win: 30.0 };

        let model = OutcomeProbabilities { home_win: 45.5, draw: 33.5, away_win: 21.0 };
        assert_eq!(
            value_outcomes(&model, &bookmaker),
            vec![PredictedOutcome::HomeWin, PredictedOutcome::Draw]
        );

        let model = OutcomeProbabilities { home_win: 45.0, draw: 33.0, away_win: 22.0 };
        assert!(value_outcomes(&model, &bookmaker).is_empty());
    }

    #[test]
    fn test_comparison_without_odds() {
        let history = vec![record("2023-08-01", "Genk", "Gent", 2, 1)];
        let model = OutcomeProbabilities { home_win: 50.0, draw: 25.0, away_win: 25.0 };

        let comparison = compare_with_bookmaker(&prediction(model), &history, DEFAULT_ODDS_LOOKBACK).unwrap();
        assert_eq!(comparison.meetings, 1);
        assert!(comparison.average_odds.is_none());
        assert!(comparison.bookmaker.is_none());
        assert!(comparison.value_outcomes.is_empty());
    }

    #[test]
    fn test_comparison_flags_underpriced_home_win() {
        let history = vec![priced(
            "2023-08-01",
            "Genk",
            "Gent",
            BookmakerOdds::new(dec!(4.00), dec!(3.00), dec!(2.00)),
        )];
        let model = OutcomeProbabilities { home_win: 50.0, draw: 25.0, away_win: 25.0 };

        let comparison = compare_with_bookmaker(&prediction(model), &history, DEFAULT_ODDS_LOOKBACK).unwrap();
        let bookmaker = comparison.bookmaker.unwrap();
        assert!((bookmaker.total() - 100.0).abs() < 1e-9);
        assert!(bookmaker.home_win < bookmaker.away_win);
        assert_eq!(comparison.value_outcomes, vec![PredictedOutcome::HomeWin]);
    }

    #[test]
    fn test_invalid_recorded_odds_are_an_error() {
        let history = vec![priced(
            "2023-08-01",
            "Genk",
            "Gent",
            BookmakerOdds::new(dec!(1.00), dec!(3.00), dec!(2.00)),
        )];
        let model = OutcomeProbabilities { home_win: 50.0, draw: 25.0, away_win: 25.0 };
        assert!(compare_with_bookmaker(&prediction(model), &history, 5).is_err());
    }
}
