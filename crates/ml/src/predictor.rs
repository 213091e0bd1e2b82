//! Single-match prediction query over the ensemble or the simple heuristic.

use footy_models::{FootyError, MatchPrediction, MatchRecord, PredictionMethod, Result, TeamStats};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::{debug, info};

use crate::condition::{ConditionSource, RandomConditions};
use crate::config::PredictionConfig;
use crate::ensemble::EnsemblePredictor;
use crate::form::calculate_recent_form;
use crate::probability::calculate_match_probabilities;
use crate::team_stats::TeamStatsMap;

const DEFAULT_DRAW_RATE: f64 = 0.25;
const DRAW_PRONE_THRESHOLD: f64 = 0.3;
const DRAW_PRONE_MAX_DIFF: f64 = 0.8;
const GOAL_NOISE_STD: f64 = 0.15;
const DRAW_NOISE_STD: f64 = 0.3;

pub struct MatchPredictor<C: ConditionSource = RandomConditions, R: Rng = SmallRng> {
    ensemble: EnsemblePredictor<C>,
    rng: R,
}

impl MatchPredictor<RandomConditions, SmallRng> {
    pub fn from_entropy(config: PredictionConfig) -> Self {
        Self::with_sources(config, RandomConditions::from_entropy(), SmallRng::from_entropy())
    }

    /// Fully reproducible predictor: conditions and noise derive from `seed`.
    pub fn seeded(config: PredictionConfig, seed: u64) -> Self {
        Self::with_sources(
            config,
            RandomConditions::seeded(seed),
            SmallRng::seed_from_u64(seed.wrapping_add(1)),
        )
    }
}

impl<C: ConditionSource, R: Rng> MatchPredictor<C, R> {
    pub fn with_sources(config: PredictionConfig, conditions: C, rng: R) -> Self {
        info!(
            "🤖 Match predictor ready (advanced: {}, form window {}, h2h lookback {})",
            config.use_advanced, config.form_window, config.h2h_lookback
        );
        Self {
            ensemble: EnsemblePredictor::with_conditions(config, conditions),
            rng,
        }
    }

    pub fn config(&self) -> &PredictionConfig {
        self.ensemble.config()
    }

    /// Predicts `home_team` hosting `away_team`.
    ///
    /// Both teams must be present in `team_stats`.
    pub fn predict(
        &mut self,
        home_team: &str,
        away_team: &str,
        team_stats: &TeamStatsMap,
        history: Option<&[MatchRecord]>,
        use_advanced: bool,
    ) -> Result<MatchPrediction> {
        let home_stats = lookup(team_stats, home_team)?;
        let away_stats = lookup(team_stats, away_team)?;

        let prediction = if use_advanced {
            let result = self.ensemble.predict(home_team, away_team, team_stats, history);
            MatchPrediction {
                home_team: home_team.to_string(),
                away_team: away_team.to_string(),
                expected_home_goals: result.expected_home_goals,
                expected_away_goals: result.expected_away_goals,
                confidence: result.confidence,
                probabilities: calculate_match_probabilities(result.expected_home_goals, result.expected_away_goals),
                method: PredictionMethod::Ensemble,
                breakdown: Some(result.breakdown),
            }
        } else {
            self.predict_simple(home_team, away_team, home_stats, away_stats, history)
        };

        debug!(
            "🎯 {} vs {}: {:.2} - {:.2}, {:.1}% confidence ({:?})",
            home_team,
            away_team,
            prediction.expected_home_goals,
            prediction.expected_away_goals,
            prediction.confidence,
            prediction.method
        );
        Ok(prediction)
    }

    fn predict_simple(
        &mut self,
        home_team: &str,
        away_team: &str,
        home_stats: &TeamStats,
        away_stats: &TeamStats,
        history: Option<&[MatchRecord]>,
    ) -> MatchPrediction {
        let window = self.ensemble.config().form_window;
        let (home_form, away_form) = history.map_or((0.5, 0.5), |h| {
            (
                calculate_recent_form(h, home_team, window).form_rating,
                calculate_recent_form(h, away_team, window).form_rating,
            )
        });

        let home_condition = self.ensemble.conditions_mut().condition_for(home_team).condition_impact;
        let away_condition = self.ensemble.conditions_mut().condition_for(away_team).condition_impact;

        let mut home = (home_stats.avg_goals_home
            + (home_form - 0.5) * 0.8
            + home_condition
            + gaussian(&mut self.rng, GOAL_NOISE_STD))
        .max(0.0);
        let mut away = (away_stats.avg_goals_away
            + (away_form - 0.5) * 0.8
            + away_condition
            + gaussian(&mut self.rng, GOAL_NOISE_STD))
        .max(0.0);

        // Draw-prone pairings pull both sides towards the mean
        let draw_tendency = (home_stats.draw_rate.unwrap_or(DEFAULT_DRAW_RATE)
            + away_stats.draw_rate.unwrap_or(DEFAULT_DRAW_RATE))
            / 2.0;
        if draw_tendency > DRAW_PRONE_THRESHOLD && (home - away).abs() < DRAW_PRONE_MAX_DIFF {
            let mean = (home + away) / 2.0;
            home = mean + gaussian(&mut self.rng, DRAW_NOISE_STD);
            away = mean + gaussian(&mut self.rng, DRAW_NOISE_STD);
        }

        let goal_diff = (home - away).abs();
        let mut confidence = (50.0 + goal_diff * 25.0 + (home_form - away_form).abs() * 20.0).min(95.0);
        if goal_diff < 0.5 {
            confidence *= 0.8;
        }

        MatchPrediction {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            expected_home_goals: home,
            expected_away_goals: away,
            confidence,
            probabilities: calculate_match_probabilities(home, away),
            method: PredictionMethod::Simple,
            breakdown: None,
        }
    }
}

fn lookup<'a>(team_stats: &'a TeamStatsMap, team: &str) -> Result<&'a TeamStats> {
    team_stats.get(team).ok_or_else(|| FootyError::UnknownTeam {
        team: team.to_string(),
    })
}

fn gaussian<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    Normal::new(0.0, std_dev).map_or(0.0, |normal| normal.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::FixedConditions;
    use crate::team_stats::TeamStatsAggregator;
    use crate::test_support::record;

    fn stats_map() -> TeamStatsMap {
        let mut map = TeamStatsMap::new();
        map.insert(
            "A".to_string(),
            TeamStats {
                total_home_matches: 10,
                avg_goals_home: 2.0,
                total_away_matches: 10,
                avg_goals_away: 1.2,
                ..TeamStats::default()
            },
        );
        map.insert(
            "B".to_string(),
            TeamStats {
                total_home_matches: 10,
                avg_goals_home: 1.3,
                total_away_matches: 10,
                avg_goals_away: 1.0,
                ..TeamStats::default()
            },
        );
        map
    }

    fn neutral_predictor() -> MatchPredictor<FixedConditions, SmallRng> {
        MatchPredictor::with_sources(
            PredictionConfig::default(),
            FixedConditions::neutral(),
            SmallRng::seed_from_u64(3),
        )
    }

    #[test]
    fn test_advanced_path() {
        let mut predictor = neutral_predictor();
        let prediction = predictor.predict("A", "B", &stats_map(), None, true).unwrap();

        assert_eq!(prediction.method, PredictionMethod::Ensemble);
        assert!((prediction.expected_home_goals - 1.94).abs() < 1e-9);
        assert!((prediction.expected_away_goals - 1.14).abs() < 1e-9);
        assert!(prediction.confidence >= 45.0 && prediction.confidence <= 100.0);
        assert!((prediction.probabilities.total() - 100.0).abs() < 1e-9);
        assert!(prediction.probabilities.home_win > prediction.probabilities.away_win);
        assert!(prediction.breakdown.is_some());
    }

    #[test]
    fn test_unknown_team_is_rejected() {
        let mut predictor = neutral_predictor();
        for advanced in [true, false] {
            let err = predictor.predict("A", "Nobody", &stats_map(), None, advanced).unwrap_err();
            assert!(matches!(err, FootyError::UnknownTeam { ref team } if team == "Nobody"));
        }
    }

    #[test]
    fn test_simple_path_stays_near_averages() {
        let mut predictor = neutral_predictor();
        for _ in 0..50 {
            let prediction = predictor.predict("A", "B", &stats_map(), None, false).unwrap();
            assert_eq!(prediction.method, PredictionMethod::Simple);
            assert!(prediction.breakdown.is_none());
            // Noise has a 0.15 standard deviation
            assert!((prediction.expected_home_goals - 2.0).abs() < 1.0);
            assert!((prediction.expected_away_goals - 1.0).abs() < 1.0);
            assert!(prediction.expected_away_goals >= 0.0);
            assert!(prediction.confidence <= 95.0);
        }
    }

    #[test]
    fn test_simple_path_form_bonus() {
        // A won its last five, B lost its last five
        let history: Vec<MatchRecord> = (1..=5)
            .flat_map(|d| {
                vec![
                    record(&format!("2023-09-0{d}"), "A", "C", 2, 0),
                    record(&format!("2023-09-0{d}"), "B", "C", 0, 2),
                ]
            })
            .collect();
        let mut map = stats_map();
        if let Some(b) = map.get_mut("B") {
            b.avg_goals_away = 2.0;
        }

        let mut predictor = neutral_predictor();
        let prediction = predictor.predict("A", "B", &map, Some(&history), false).unwrap();
        // home ≈ 2.0 + 0.4, away ≈ 2.0 - 0.4
        assert!(prediction.expected_home_goals > prediction.expected_away_goals);
        assert!(prediction.confidence > 60.0);
    }

    #[test]
    fn test_seeded_predictors_agree() {
        let history = vec![
            record("2023-08-01", "A", "B", 2, 1),
            record("2023-08-08", "B", "A", 1, 1),
        ];
        let stats = TeamStatsAggregator::new().aggregate(&history, &["2023-2024"]);

        let mut first = MatchPredictor::seeded(PredictionConfig::default(), 11);
        let mut second = MatchPredictor::seeded(PredictionConfig::default(), 11);
        let a = first.predict("A", "B", &stats, Some(&history), true).unwrap();
        let b = second.predict("A", "B", &stats, Some(&history), true).unwrap();
        assert_eq!(a, b);
    }
}
