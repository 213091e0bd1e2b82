use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use footy_models::{round_to, MatchPrediction, PredictedOutcome, PredictionOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AccuracySummary {
    pub total: u64,
    pub correct: u64,
    pub accuracy: f64,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OutcomeAccuracy {
    pub total: u64,
    pub correct: u64,
    pub accuracy: f64,
}

/// Running history of predictions checked against real results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionTracker {
    outcomes: Vec<PredictionOutcome>,
}

impl PredictionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> &[PredictionOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn record(
        &mut self,
        date: NaiveDate,
        prediction: &MatchPrediction,
        actual_score: (u8, u8),
    ) -> &PredictionOutcome {
        let outcome = PredictionOutcome::new(date, prediction, actual_score);
        info!(
            "📝 Recorded {} vs {}: predicted {}, actual {} ({})",
            outcome.home_team,
            outcome.away_team,
            outcome.predicted.code(),
            outcome.actual.code(),
            if outcome.correct { "✅" } else { "❌" }
        );
        self.outcomes.push(outcome);
        &self.outcomes[self.outcomes.len() - 1]
    }

    pub fn summary(&self) -> AccuracySummary {
        let total = self.outcomes.len();
        if total == 0 {
            return AccuracySummary::default();
        }
        let correct = self.outcomes.iter().filter(|o| o.correct).count();
        let confidence: f64 = self.outcomes.iter().map(|o| o.confidence).sum();

        AccuracySummary {
            total: total as u64,
            correct: correct as u64,
            accuracy: round_to(correct as f64 / total as f64 * 100.0, 1),
            avg_confidence: round_to(confidence / total as f64, 1),
        }
    }

    /// Accuracy percentage after each recorded prediction.
    pub fn cumulative_accuracy(&self) -> Vec<f64> {
        let mut correct = 0usize;
        self.outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| {
                correct += usize::from(o.correct);
                round_to(correct as f64 / (i + 1) as f64 * 100.0, 1)
            })
            .collect()
    }

    /// Accuracy grouped by the outcome that was predicted.
    pub fn accuracy_by_outcome(&self) -> BTreeMap<PredictedOutcome, OutcomeAccuracy> {
        let mut groups: BTreeMap<PredictedOutcome, OutcomeAccuracy> = BTreeMap::new();
        for o in &self.outcomes {
            let entry = groups.entry(o.predicted).or_default();
            entry.total += 1;
            entry.correct += u64::from(o.correct);
        }
        for entry in groups.values_mut() {
            entry.accuracy = round_to(entry.correct as f64 / entry.total as f64 * 100.0, 1);
        }
        groups
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(&self.outcomes).context("Failed to serialize prediction history")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write prediction history to {}", path.display()))?;
        info!("💾 Saved {} predictions to {}", self.outcomes.len(), path.display());
        Ok(())
    }

    /// Loads a saved history; a missing file yields an empty tracker.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(Self::new());
        }
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read prediction history from {}", path.display()))?;
        let outcomes: Vec<PredictionOutcome> =
            serde_json::from_slice(&bytes).with_context(|| format!("Invalid prediction history in {}", path.display()))?;
        info!("📂 Loaded {} predictions from {}", outcomes.len(), path.display());
        Ok(Self { outcomes })
    }
}
