use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use footy_data::available_seasons;
use footy_ml::{
    calculate_home_advantage, calculate_recent_form, compare_with_bookmaker, head_to_head, OddsComparison,
    TeamStatsMap, DEFAULT_FORM_WINDOW, DEFAULT_ODDS_LOOKBACK,
};
use footy_models::{
    BookmakerOdds, FormSummary, H2HSummary, HomeAdvantage, MatchPrediction, PredictedOutcome, PredictionOutcome,
    SimulatedMatch,
};
use footy_services::{
    AccuracySummary, DriverConfig, FixturePrediction, MatchSimulationState, OutcomeAccuracy, PlaybackDriver,
    PlaybackPhase, PlaybackSnapshot, PlaybackSpeed, TickUpdate,
};
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const MAX_FIXTURES: usize = 100;
const MAX_FORM_WINDOW: usize = 50;
const FAIR_ODDS_MARGIN: f64 = 0.05;

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: i64,
    pub matches_loaded: usize,
    pub active_simulations: usize,
}

#[derive(Deserialize)]
pub struct SeasonsQuery {
    /// Comma-separated season labels.
    pub seasons: Option<String>,
}

#[derive(Deserialize)]
pub struct FormQuery {
    pub window: Option<usize>,
}

#[derive(Deserialize)]
pub struct HeadToHeadQuery {
    pub home: String,
    pub away: String,
    pub lookback: Option<usize>,
}

#[derive(Deserialize)]
pub struct OddsComparisonQuery {
    pub home: String,
    pub away: String,
    pub lookback: Option<usize>,
    /// Comma-separated season labels.
    pub seasons: Option<String>,
}

#[derive(Deserialize)]
pub struct PredictionRequest {
    pub home_team: String,
    pub away_team: String,
    pub seasons: Option<Vec<String>>,
    pub use_advanced: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: MatchPrediction,
    pub outcome: PredictedOutcome,
    pub result_code: String,
    /// Odds priced from the predicted probabilities with a bookmaker margin.
    pub odds: Option<BookmakerOdds>,
}

#[derive(Deserialize)]
pub struct FixturesRequest {
    pub count: usize,
    #[serde(default)]
    pub confidence_filter: f64,
    pub seasons: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct SimulationRequest {
    pub home_team: String,
    pub away_team: String,
    pub speed: u32,
    pub seasons: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
pub struct SimulationCreated {
    pub id: Uuid,
    pub prediction: MatchPrediction,
    pub snapshot: PlaybackSnapshot,
}

#[derive(Deserialize)]
pub struct RecordOutcomeRequest {
    pub date: Option<NaiveDate>,
    pub prediction: MatchPrediction,
    pub home_goals: u8,
    pub away_goals: u8,
}

#[derive(Serialize, Deserialize)]
pub struct HistoryResponse {
    pub summary: AccuracySummary,
    pub cumulative_accuracy: Vec<f64>,
    pub by_outcome: BTreeMap<PredictedOutcome, OutcomeAccuracy>,
    pub outcomes: Vec<PredictionOutcome>,
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        // Reference data
        .route("/api/v1/seasons", get(get_seasons))
        .route("/api/v1/teams", get(get_team_stats))
        .route("/api/v1/teams/:team/form", get(get_team_form))
        .route("/api/v1/teams/:team/home-advantage", get(get_home_advantage))
        .route("/api/v1/head-to-head", get(get_head_to_head))
        // Predictions
        .route("/api/v1/predictions", post(create_prediction))
        .route("/api/v1/fixtures", post(create_fixtures))
        .route("/api/v1/odds-comparison", get(get_odds_comparison))
        // Live simulations
        .route("/api/v1/simulations", post(start_simulation))
        .route(
            "/api/v1/simulations/:id",
            get(get_simulation).delete(delete_simulation),
        )
        .route("/api/v1/simulations/:id/tick", post(tick_simulation))
        .route("/api/v1/simulations/:id/reset", post(reset_simulation))
        .route("/api/v1/simulations/:id/play", post(play_simulation))
        // Accuracy tracking
        .route("/api/v1/history", get(get_history).post(record_outcome))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (now - state.started_at).num_seconds(),
        matches_loaded: state.history.len(),
        active_simulations: state.sessions.len(),
    })
}

async fn get_seasons(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse::ok(available_seasons(&state.history)))
}

async fn get_team_stats(
    Query(params): Query<SeasonsQuery>,
    State(state): State<AppState>,
) -> Json<ApiResponse<TeamStatsMap>> {
    let requested = params.seasons.as_deref().map(split_seasons);
    let stats = state.team_stats(requested.as_deref());
    let message = format!("{} teams", stats.len());
    Json(ApiResponse::with_message(stats, message))
}

async fn get_team_form(
    Path(team): Path<String>,
    Query(params): Query<FormQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<FormSummary>>> {
    ensure_known(&state, &team)?;
    let window = params.window.unwrap_or(DEFAULT_FORM_WINDOW).clamp(1, MAX_FORM_WINDOW);
    Ok(Json(ApiResponse::ok(calculate_recent_form(&state.history, &team, window))))
}

async fn get_home_advantage(
    Path(team): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<HomeAdvantage>>> {
    ensure_known(&state, &team)?;
    Ok(Json(ApiResponse::ok(calculate_home_advantage(&state.history, &team))))
}

async fn get_head_to_head(
    Query(params): Query<HeadToHeadQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<H2HSummary>>> {
    ensure_distinct(&params.home, &params.away)?;
    let lookback = params.lookback.unwrap_or(state.settings.prediction.h2h_lookback);
    Ok(Json(ApiResponse::ok(head_to_head(
        &state.history,
        &params.home,
        &params.away,
        lookback,
    ))))
}

async fn create_prediction(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> ApiResult<Json<ApiResponse<PredictionResponse>>> {
    ensure_distinct(&request.home_team, &request.away_team)?;

    let stats = state.team_stats(request.seasons.as_deref());
    let use_advanced = request.use_advanced.unwrap_or(state.settings.prediction.use_advanced);
    let prediction = state.predictor().predict(
        &request.home_team,
        &request.away_team,
        &stats,
        Some(state.history.as_slice()),
        use_advanced,
    )?;

    let outcome = prediction.predicted_outcome();
    let odds = BookmakerOdds::from_probabilities(&prediction.probabilities, FAIR_ODDS_MARGIN).ok();
    info!(
        "🎯 Prediction {} vs {}: {:.1} - {:.1} ({})",
        prediction.home_team,
        prediction.away_team,
        prediction.expected_home_goals,
        prediction.expected_away_goals,
        outcome.code()
    );

    Ok(Json(ApiResponse::ok(PredictionResponse {
        result_code: outcome.code().to_string(),
        outcome,
        odds,
        prediction,
    })))
}

async fn get_odds_comparison(
    Query(params): Query<OddsComparisonQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<OddsComparison>>> {
    ensure_distinct(&params.home, &params.away)?;

    let requested = params.seasons.as_deref().map(split_seasons);
    let stats = state.team_stats(requested.as_deref());
    let prediction = state.predictor().predict(
        &params.home,
        &params.away,
        &stats,
        Some(state.history.as_slice()),
        state.settings.prediction.use_advanced,
    )?;

    let lookback = params.lookback.unwrap_or(DEFAULT_ODDS_LOOKBACK).max(1);
    let comparison = compare_with_bookmaker(&prediction, state.history.as_slice(), lookback)?;
    if comparison.meetings == 0 {
        return Err(ApiError::NotFound(format!(
            "No meetings between {} and {}",
            params.home, params.away
        )));
    }

    info!(
        "💰 Odds comparison {} vs {}: {} value outcome(s)",
        params.home,
        params.away,
        comparison.value_outcomes.len()
    );
    Ok(Json(ApiResponse::ok(comparison)))
}

async fn create_fixtures(
    State(state): State<AppState>,
    Json(request): Json<FixturesRequest>,
) -> ApiResult<Json<ApiResponse<Vec<FixturePrediction>>>> {
    if request.count == 0 || request.count > MAX_FIXTURES {
        return Err(ApiError::BadRequest(format!(
            "count must be between 1 and {MAX_FIXTURES}"
        )));
    }

    let stats = state.team_stats(request.seasons.as_deref());
    let teams: Vec<String> = stats.keys().cloned().collect();
    let fixtures = state.fixture_planner().plan(
        &mut state.predictor(),
        &teams,
        &stats,
        Some(state.history.as_slice()),
        request.count,
        request.confidence_filter,
        Utc::now().date_naive(),
    );
    Ok(Json(ApiResponse::ok(fixtures)))
}

async fn start_simulation(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SimulationCreated>>)> {
    ensure_distinct(&request.home_team, &request.away_team)?;
    let speed = PlaybackSpeed::try_from(request.speed)?;

    let stats = state.team_stats(request.seasons.as_deref());
    let prediction = state.predictor().predict(
        &request.home_team,
        &request.away_team,
        &stats,
        Some(state.history.as_slice()),
        state.settings.prediction.use_advanced,
    )?;
    let simulation: SimulatedMatch = state.simulator().simulate(
        &request.home_team,
        &request.away_team,
        prediction.expected_home_goals,
        prediction.expected_away_goals,
    );

    let mut playback = MatchSimulationState::new();
    playback.start(simulation, speed)?;
    let snapshot = playback.snapshot();

    let id = Uuid::new_v4();
    state.sessions.insert(id, playback);
    info!("🎮 Simulation {} started ({} active)", id, state.sessions.len());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SimulationCreated {
            id,
            prediction,
            snapshot,
        })),
    ))
}

async fn tick_simulation(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TickUpdate>>> {
    let mut session = state
        .sessions
        .get_mut(&id)
        .ok_or_else(|| session_not_found(id))?;
    // Checked under the session lock so a concurrent play sees this tick in its copy
    if state.playing.contains_key(&id) {
        return Err(ApiError::Conflict(format!("Simulation {id} is playing in the background")));
    }
    let update = session.tick()?;
    Ok(Json(ApiResponse::ok(update)))
}

async fn get_simulation(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<PlaybackSnapshot>>> {
    let session = state.sessions.get(&id).ok_or_else(|| session_not_found(id))?;
    Ok(Json(ApiResponse::ok(session.snapshot())))
}

async fn reset_simulation(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<PlaybackSnapshot>>> {
    stop_background_playback(&state, id);
    let mut session = state
        .sessions
        .get_mut(&id)
        .ok_or_else(|| session_not_found(id))?;
    session.reset();
    Ok(Json(ApiResponse::ok(session.snapshot())))
}

async fn delete_simulation(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    stop_background_playback(&state, id);
    state
        .sessions
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| session_not_found(id))
}

/// Drives a running session on a background task at its playback speed.
async fn play_simulation(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PlaybackSnapshot>>)> {
    if !state.sessions.contains_key(&id) {
        return Err(session_not_found(id));
    }

    // Claim the session before copying it so manual ticks are refused from here on
    let cancel = CancellationToken::new();
    match state.playing.entry(id) {
        Entry::Occupied(_) => {
            return Err(ApiError::Conflict(format!("Simulation {id} is already playing")));
        }
        Entry::Vacant(slot) => {
            slot.insert(cancel.clone());
        }
    }

    let playback = match state.sessions.get(&id).map(|s| s.value().clone()) {
        Some(playback) if playback.phase() == PlaybackPhase::Running => playback,
        other => {
            state.playing.remove(&id);
            return Err(match other {
                Some(playback) => ApiError::Conflict(format!(
                    "Simulation {id} is {}",
                    playback.phase().as_str()
                )),
                None => session_not_found(id),
            });
        }
    };

    let snapshot = playback.snapshot();
    let (sender, mut receiver) = mpsc::unbounded_channel::<TickUpdate>();
    let driver = PlaybackDriver::new(DriverConfig {
        tick_ms: state.settings.tick_ms,
    });

    // Ticks are deterministic, so replaying each one keeps the stored session in step
    let sessions = state.sessions.clone();
    let mirror = tokio::spawn(async move {
        while let Some(update) = receiver.recv().await {
            let Some(mut session) = sessions.get_mut(&id) else {
                break;
            };
            if session.tick().is_err() {
                break;
            }
            debug!("📡 Simulation {} at {}'", id, update.minute);
        }
    });

    let playing = state.playing.clone();
    tokio::spawn(async move {
        if let Err(e) = driver.run(playback, sender, cancel).await {
            warn!("🎬 Background playback of {} stopped: {:#}", id, e);
        }
        let _ = mirror.await;
        playing.remove(&id);
    });

    info!("🎬 Simulation {} playing in the background", id);
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(snapshot))))
}

async fn get_history(State(state): State<AppState>) -> Json<ApiResponse<HistoryResponse>> {
    let tracker = state.tracker.read().await;
    Json(ApiResponse::ok(HistoryResponse {
        summary: tracker.summary(),
        cumulative_accuracy: tracker.cumulative_accuracy(),
        by_outcome: tracker.accuracy_by_outcome(),
        outcomes: tracker.outcomes().to_vec(),
    }))
}

async fn record_outcome(
    State(state): State<AppState>,
    Json(request): Json<RecordOutcomeRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PredictionOutcome>>)> {
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let mut tracker = state.tracker.write().await;
    let outcome = tracker
        .record(date, &request.prediction, (request.home_goals, request.away_goals))
        .clone();

    if let Some(path) = &state.settings.tracker_path {
        if let Err(e) = tracker.save(path).await {
            warn!("💾 Could not persist prediction history: {:#}", e);
        }
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(outcome))))
}

fn split_seasons(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn ensure_distinct(home: &str, away: &str) -> ApiResult<()> {
    if home == away {
        return Err(ApiError::BadRequest("home and away teams must differ".to_string()));
    }
    Ok(())
}

fn ensure_known(state: &AppState, team: &str) -> ApiResult<()> {
    if state.knows_team(team) {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("Unknown team: {team}")))
    }
}

fn stop_background_playback(state: &AppState, id: Uuid) {
    if let Some((_, cancel)) = state.playing.remove(&id) {
        cancel.cancel();
    }
}

fn session_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Simulation {id} not found"))
}
