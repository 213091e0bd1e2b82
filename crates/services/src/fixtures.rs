use chrono::{Duration, NaiveDate};
use footy_ml::{ConditionSource, MatchPredictor, TeamStatsMap};
use footy_models::{round_to, MatchRecord, OutcomeProbabilities, PredictedOutcome};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 75.0 {
            Self::Low
        } else if confidence > 60.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixturePrediction {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    /// `1`, `X` or `2`.
    pub result_code: String,
    pub most_likely: PredictedOutcome,
    pub expected_home_goals: f64,
    pub expected_away_goals: f64,
    pub total_goals: f64,
    pub confidence: f64,
    pub probabilities: OutcomeProbabilities,
    pub risk: RiskLevel,
}

/// Draws random upcoming pairings and predicts each of them.
pub struct FixturePlanner<R: Rng = SmallRng> {
    rng: R,
}

impl FixturePlanner<SmallRng> {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for FixturePlanner<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FixturePlanner<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Predicts `count` random fixtures dated 1–30 days after `today` and
    /// keeps those reaching `confidence_filter`.
    #[allow(clippy::too_many_arguments)]
    pub fn plan<C: ConditionSource, P: Rng>(
        &mut self,
        predictor: &mut MatchPredictor<C, P>,
        teams: &[String],
        team_stats: &TeamStatsMap,
        history: Option<&[MatchRecord]>,
        count: usize,
        confidence_filter: f64,
        today: NaiveDate,
    ) -> Vec<FixturePrediction> {
        if teams.len() < 2 {
            debug!("📅 Not enough teams to plan fixtures");
            return Vec::new();
        }

        let use_advanced = predictor.config().use_advanced;
        let mut fixtures = Vec::with_capacity(count);
        for _ in 0..count {
            let mut pair = teams.choose_multiple(&mut self.rng, 2);
            let (Some(home), Some(away)) = (pair.next(), pair.next()) else {
                continue;
            };
            let date = today + Duration::days(self.rng.gen_range(1..=30));

            // Teams missing from the stats map are skipped
            let Ok(prediction) = predictor.predict(home, away, team_stats, history, use_advanced) else {
                continue;
            };
            if !prediction.is_confident(confidence_filter) {
                continue;
            }

            fixtures.push(FixturePrediction {
                date,
                home_team: home.clone(),
                away_team: away.clone(),
                result_code: prediction.predicted_outcome().code().to_string(),
                most_likely: prediction.probabilities.most_likely_outcome(),
                expected_home_goals: round_to(prediction.expected_home_goals, 2),
                expected_away_goals: round_to(prediction.expected_away_goals, 2),
                total_goals: round_to(prediction.total_goals(), 2),
                confidence: round_to(prediction.confidence, 1),
                probabilities: prediction.probabilities,
                risk: RiskLevel::from_confidence(prediction.confidence),
            });
        }

        info!("📅 Planned {} of {} fixtures", fixtures.len(), count);
        fixtures
    }
}
