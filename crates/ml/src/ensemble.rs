//! Six-model weighted ensemble producing expected goals and a confidence score.

use footy_models::{EnsembleResult, GoalPair, H2HSummary, HomeAdvantage, MatchRecord, ModelBreakdown, TeamStats};
use tracing::debug;

use crate::condition::{ConditionSource, RandomConditions};
use crate::config::PredictionConfig;
use crate::form::calculate_recent_form;
use crate::head_to_head::head_to_head;
use crate::home_advantage::calculate_home_advantage;
use crate::team_stats::TeamStatsMap;

/// Weights of base, form, attack/defense, condition, head-to-head and home-advantage models.
pub const ENSEMBLE_WEIGHTS: [f64; 6] = [0.20, 0.20, 0.20, 0.15, 0.15, 0.10];

/// Goals assumed when a team or a field is unknown.
pub const FALLBACK_GOALS: f64 = 1.5;

const VARIANCE_PENALTY_SCALE: f64 = 50.0;
const MAX_VARIANCE_PENALTY: f64 = 30.0;

pub struct EnsemblePredictor<C: ConditionSource = RandomConditions> {
    config: PredictionConfig,
    conditions: C,
}

impl<C: ConditionSource> EnsemblePredictor<C> {
    pub fn with_conditions(config: PredictionConfig, conditions: C) -> Self {
        Self { config, conditions }
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    pub(crate) fn conditions_mut(&mut self) -> &mut C {
        &mut self.conditions
    }

    /// Combines the six sub-models for `home_team` hosting `away_team`.
    ///
    /// Without `history` the form, head-to-head and home-advantage models
    /// fall back to their neutral defaults.
    pub fn predict(
        &mut self,
        home_team: &str,
        away_team: &str,
        team_stats: &TeamStatsMap,
        history: Option<&[MatchRecord]>,
    ) -> EnsembleResult {
        let home_stats = team_stats.get(home_team);
        let away_stats = team_stats.get(away_team);

        // Model 1: season scoring averages
        let base = GoalPair::new(
            home_stats.map_or(FALLBACK_GOALS, |s| s.avg_goals_home),
            away_stats.map_or(FALLBACK_GOALS, |s| s.avg_goals_away),
        );

        // Model 2: recent form, multiplier in [0.8, 1.2]
        let (home_rating, away_rating) = history.map_or((0.5, 0.5), |h| {
            (
                calculate_recent_form(h, home_team, self.config.form_window).form_rating,
                calculate_recent_form(h, away_team, self.config.form_window).form_rating,
            )
        });
        let form = GoalPair::new(
            base.home * form_multiplier(home_rating),
            base.away * form_multiplier(away_rating),
        );

        // Model 3: attack against the opponent's defence
        let attack = |s: Option<&TeamStats>| s.and_then(|s| s.avg_goals_scored).unwrap_or(FALLBACK_GOALS);
        let defense = |s: Option<&TeamStats>| s.and_then(|s| s.avg_goals_conceded).unwrap_or(FALLBACK_GOALS);
        let attack_defense = GoalPair::new(
            (attack(home_stats) + defense(away_stats)) / 2.0,
            (attack(away_stats) + defense(home_stats)) / 2.0,
        );

        // Model 4: match-day condition
        let home_condition = self.conditions.condition_for(home_team);
        let away_condition = self.conditions.condition_for(away_team);
        let condition = GoalPair::new(
            base.home + home_condition.condition_impact,
            base.away + away_condition.condition_impact,
        );

        // Model 5: head-to-head history
        let h2h = history.map_or_else(H2HSummary::empty, |h| {
            head_to_head(h, home_team, away_team, self.config.h2h_lookback)
        });
        let head_to_head_goals = if h2h.has_data {
            let shift = h2h.advantage.goal_shift();
            GoalPair::new(h2h.avg_goals_home + shift, h2h.avg_goals_away - shift * 0.5)
        } else {
            base
        };

        // Model 6: team-specific home advantage, partial inverse for the visitors
        let home_advantage_data = history.map_or_else(HomeAdvantage::standard, |h| {
            calculate_home_advantage(h, home_team)
        });
        let factor = home_advantage_data.factor;
        let home_advantage = GoalPair::new(base.home * factor, base.away * (2.0 - factor * 0.5));

        let breakdown = ModelBreakdown {
            base,
            form,
            attack_defense,
            condition,
            head_to_head: head_to_head_goals,
            home_advantage,
            home_condition,
            away_condition,
            h2h,
            home_advantage_data,
        };

        let estimates = breakdown.estimates();
        let expected_home_goals = weighted_sum(estimates.iter().map(|p| p.home)).max(0.0);
        let expected_away_goals = weighted_sum(estimates.iter().map(|p| p.away)).max(0.0);
        let confidence = self.confidence(&breakdown);

        debug!(
            "🧮 Ensemble {} vs {}: {:.2} - {:.2} ({:.1}% confidence)",
            home_team, away_team, expected_home_goals, expected_away_goals, confidence
        );

        EnsembleResult {
            expected_home_goals,
            expected_away_goals,
            confidence,
            breakdown,
        }
    }

    /// Base confidence minus a disagreement penalty, plus a bonus for a rich
    /// head-to-head record, clamped to the configured bounds.
    fn confidence(&self, breakdown: &ModelBreakdown) -> f64 {
        let estimates = breakdown.estimates();
        let home_variance = variance(estimates.iter().map(|p| p.home));
        let away_variance = variance(estimates.iter().map(|p| p.away));
        let avg_variance = (home_variance + away_variance) / 2.0;

        let penalty = (avg_variance * VARIANCE_PENALTY_SCALE).min(MAX_VARIANCE_PENALTY);
        let bonus = if breakdown.h2h.has_data && breakdown.h2h.total_matches >= self.config.h2h_bonus_min_matches {
            self.config.h2h_bonus
        } else {
            0.0
        };

        (self.config.base_confidence - penalty + bonus).clamp(self.config.min_confidence, self.config.max_confidence)
    }
}

fn form_multiplier(rating: f64) -> f64 {
    0.8 + rating * 0.4
}

fn weighted_sum(values: impl Iterator<Item = f64>) -> f64 {
    values.zip(ENSEMBLE_WEIGHTS).map(|(v, w)| v * w).sum()
}

/// Population variance.
fn variance(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = values.clone().count();
    if n == 0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64
}
