use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::FullTimeResult;
use crate::stats::{ConditionAdjustment, H2HSummary, HomeAdvantage};

/// Rounds to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// A (home, away) pair of expected goals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GoalPair {
    pub home: f64,
    pub away: f64,
}

impl GoalPair {
    pub fn new(home: f64, away: f64) -> Self {
        Self { home, away }
    }
}

/// Raw output of every sub-model, kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelBreakdown {
    pub base: GoalPair,
    pub form: GoalPair,
    pub attack_defense: GoalPair,
    pub condition: GoalPair,
    pub head_to_head: GoalPair,
    pub home_advantage: GoalPair,
    pub home_condition: ConditionAdjustment,
    pub away_condition: ConditionAdjustment,
    pub h2h: H2HSummary,
    pub home_advantage_data: HomeAdvantage,
}

impl ModelBreakdown {
    /// Sub-model estimates in weight order.
    pub fn estimates(&self) -> [GoalPair; 6] {
        [
            self.base,
            self.form,
            self.attack_defense,
            self.condition,
            self.head_to_head,
            self.home_advantage,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnsembleResult {
    pub expected_home_goals: f64,
    pub expected_away_goals: f64,
    /// Percentage in [45, 100].
    pub confidence: f64,
    pub breakdown: ModelBreakdown,
}

/// Home/draw/away percentages summing to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl OutcomeProbabilities {
    /// Normalises raw weights to percentages rounded to one decimal.
    ///
    /// Any rounding residue is moved onto the largest component so the three
    /// values always add up to 100. A zero or non-finite mass falls back to an
    /// even split.
    pub fn normalized(home: f64, draw: f64, away: f64) -> Self {
        let total = home + draw + away;
        if !total.is_finite() || total <= 0.0 {
            return Self { home_win: 33.3, draw: 33.4, away_win: 33.3 };
        }

        let mut probs = Self {
            home_win: round_to(home / total * 100.0, 1),
            draw: round_to(draw / total * 100.0, 1),
            away_win: round_to(away / total * 100.0, 1),
        };

        let residue = round_to(100.0 - probs.total(), 1);
        if residue != 0.0 {
            let largest = probs.largest_mut();
            *largest = round_to(*largest + residue, 1);
        }
        probs
    }

    pub fn total(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }

    fn largest_mut(&mut self) -> &mut f64 {
        if self.home_win >= self.draw && self.home_win >= self.away_win {
            &mut self.home_win
        } else if self.away_win >= self.draw {
            &mut self.away_win
        } else {
            &mut self.draw
        }
    }

    /// Strict favourite, ties count as a draw.
    pub fn most_likely_outcome(&self) -> PredictedOutcome {
        if self.home_win > self.away_win && self.home_win > self.draw {
            PredictedOutcome::HomeWin
        } else if self.away_win > self.home_win && self.away_win > self.draw {
            PredictedOutcome::AwayWin
        } else {
            PredictedOutcome::Draw
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PredictedOutcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl PredictedOutcome {
    /// Outcome implied by predicted goals, a side needing a half-goal margin to win.
    pub fn from_goals(home: f64, away: f64) -> Self {
        if home > away + 0.5 {
            Self::HomeWin
        } else if away > home + 0.5 {
            Self::AwayWin
        } else {
            Self::Draw
        }
    }

    /// Betting-slip code: `1`, `X` or `2`.
    pub fn code(self) -> &'static str {
        match self {
            Self::HomeWin => "1",
            Self::Draw => "X",
            Self::AwayWin => "2",
        }
    }
}

impl From<FullTimeResult> for PredictedOutcome {
    fn from(result: FullTimeResult) -> Self {
        match result {
            FullTimeResult::Home => Self::HomeWin,
            FullTimeResult::Draw => Self::Draw,
            FullTimeResult::Away => Self::AwayWin,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    Ensemble,
    Simple,
}

/// Answer to a single-match prediction query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchPrediction {
    pub home_team: String,
    pub away_team: String,
    pub expected_home_goals: f64,
    pub expected_away_goals: f64,
    pub confidence: f64,
    pub probabilities: OutcomeProbabilities,
    pub method: PredictionMethod,
    pub breakdown: Option<ModelBreakdown>,
}

impl MatchPrediction {
    pub fn predicted_outcome(&self) -> PredictedOutcome {
        PredictedOutcome::from_goals(self.expected_home_goals, self.expected_away_goals)
    }

    pub fn total_goals(&self) -> f64 {
        self.expected_home_goals + self.expected_away_goals
    }

    /// Whether the prediction clears a minimum confidence.
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

/// A prediction compared with what actually happened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionOutcome {
    pub id: Uuid,
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub predicted: PredictedOutcome,
    pub predicted_score: (u8, u8),
    pub actual: PredictedOutcome,
    pub actual_score: (u8, u8),
    pub confidence: f64,
    pub correct: bool,
}

impl PredictionOutcome {
    pub fn new(
        date: NaiveDate,
        prediction: &MatchPrediction,
        actual_score: (u8, u8),
    ) -> Self {
        let predicted = prediction.predicted_outcome();
        let actual = FullTimeResult::from_goals(actual_score.0, actual_score.1).into();
        Self {
            id: Uuid::new_v4(),
            date,
            home_team: prediction.home_team.clone(),
            away_team: prediction.away_team.clone(),
            predicted,
            predicted_score: (
                whole_goals(prediction.expected_home_goals),
                whole_goals(prediction.expected_away_goals),
            ),
            actual,
            actual_score,
            confidence: prediction.confidence,
            correct: predicted == actual,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_goals(expected: f64) -> u8 {
    expected.round().clamp(0.0, f64::from(u8::MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalized_sums_to_hundred() {
        let probs = OutcomeProbabilities::normalized(1.0, 1.0, 1.0);
        assert!((probs.total() - 100.0).abs() < 1e-9);
        assert_eq!(probs.home_win, 33.4);
        assert_eq!(probs.draw, 33.3);
    }

    #[test]
    fn test_degenerate_mass() {
        let probs = OutcomeProbabilities::normalized(0.0, 0.0, 0.0);
        assert!((probs.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_most_likely_outcome() {
        let probs = OutcomeProbabilities { home_win: 50.0, draw: 25.0, away_win: 25.0 };
        assert_eq!(probs.most_likely_outcome(), PredictedOutcome::HomeWin);
        let probs = OutcomeProbabilities { home_win: 20.0, draw: 45.0, away_win: 35.0 };
        assert_eq!(probs.most_likely_outcome(), PredictedOutcome::Draw);
    }

    #[test]
    fn test_outcome_from_goals() {
        assert_eq!(PredictedOutcome::from_goals(2.1, 1.0), PredictedOutcome::HomeWin);
        assert_eq!(PredictedOutcome::from_goals(1.4, 1.0), PredictedOutcome::Draw);
        assert_eq!(PredictedOutcome::from_goals(0.4, 1.0), PredictedOutcome::AwayWin);
        assert_eq!(PredictedOutcome::AwayWin.code(), "2");
    }

    #[test]
    fn test_confidence_threshold_is_inclusive() {
        let prediction = MatchPrediction {
            home_team: "Genk".to_string(),
            away_team: "Gent".to_string(),
            expected_home_goals: 1.8,
            expected_away_goals: 0.9,
            confidence: 60.0,
            probabilities: OutcomeProbabilities { home_win: 50.0, draw: 25.0, away_win: 25.0 },
            method: PredictionMethod::Simple,
            breakdown: None,
        };
        assert!(prediction.is_confident(60.0));
        assert!(!prediction.is_confident(60.1));
    }

    proptest! {
        #[test]
        fn prop_normalized_total(h in 0.0f64..10.0, d in 0.0f64..10.0, a in 0.0f64..10.0) {
            let probs = OutcomeProbabilities::normalized(h, d, a);
            prop_assert!((probs.total() - 100.0).abs() <= 0.1 + 1e-9);
        }
    }
}
