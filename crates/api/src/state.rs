use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use footy_data::available_seasons;
use footy_ml::{MatchPredictor, PredictionConfig, TeamStatsAggregator, TeamStatsMap};
use footy_models::MatchRecord;
use footy_services::{DriverConfig, FixturePlanner, MatchSimulationState, MatchSimulator, PredictionTracker};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Settings the handlers need from the application configuration.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub prediction: PredictionConfig,
    /// Seasons used when a request names none; empty means all.
    pub default_seasons: Vec<String>,
    /// Fixed seed for reproducible predictions and simulations.
    pub seed: Option<u64>,
    /// Where recorded outcomes are persisted, if anywhere.
    pub tracker_path: Option<PathBuf>,
    /// Duration of one background playback tick at x1.
    pub tick_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            prediction: PredictionConfig::default(),
            default_seasons: Vec::new(),
            seed: None,
            tracker_path: None,
            tick_ms: DriverConfig::default().tick_ms,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub history: Arc<Vec<MatchRecord>>,
    pub settings: Arc<ApiSettings>,
    pub tracker: Arc<RwLock<PredictionTracker>>,
    pub sessions: Arc<DashMap<Uuid, MatchSimulationState>>,
    /// Sessions currently driven in the background.
    pub playing: Arc<DashMap<Uuid, CancellationToken>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(history: Vec<MatchRecord>, settings: ApiSettings, tracker: PredictionTracker) -> Self {
        Self {
            history: Arc::new(history),
            settings: Arc::new(settings),
            tracker: Arc::new(RwLock::new(tracker)),
            sessions: Arc::new(DashMap::new()),
            playing: Arc::new(DashMap::new()),
            started_at: Utc::now(),
        }
    }

    /// Requested seasons, else the configured default, else every season on record.
    pub fn resolve_seasons(&self, requested: Option<&[String]>) -> Vec<String> {
        match requested {
            Some(seasons) if !seasons.is_empty() => seasons.to_vec(),
            _ if !self.settings.default_seasons.is_empty() => self.settings.default_seasons.clone(),
            _ => available_seasons(&self.history),
        }
    }

    pub fn team_stats(&self, requested: Option<&[String]>) -> TeamStatsMap {
        TeamStatsAggregator::new()
            .with_extended_profile(self.settings.prediction.extended_profile)
            .aggregate(&self.history, &self.resolve_seasons(requested))
    }

    pub fn predictor(&self) -> MatchPredictor {
        let config = self.settings.prediction.clone();
        match self.settings.seed {
            Some(seed) => MatchPredictor::seeded(config, seed),
            None => MatchPredictor::from_entropy(config),
        }
    }

    pub fn simulator(&self) -> MatchSimulator {
        self.settings.seed.map_or_else(MatchSimulator::new, MatchSimulator::seeded)
    }

    pub fn fixture_planner(&self) -> FixturePlanner {
        self.settings.seed.map_or_else(FixturePlanner::new, FixturePlanner::seeded)
    }

    pub fn knows_team(&self, team: &str) -> bool {
        self.history.iter().any(|m| m.involves(team))
    }
}
