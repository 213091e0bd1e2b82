mod config;

use anyhow::{Context, Result};
use config::AppConfig;
use footy_api::{create_routes, AppState};
use footy_data::{available_seasons, team_names, CsvHistory, HistorySource};
use footy_services::PredictionTracker;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "footy_rs=debug,footy_ml=info,footy_services=info,footy_data=info,footy_api=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Footy-RS match prediction engine");

    let config = AppConfig::new().context("Failed to load configuration")?;
    config.validate()?;
    info!("✅ Configuration loaded successfully");
    info!("📁 Dataset: {}", config.data.csv_path.display());
    info!("🌐 Server will bind to: {}", config.server_addr());

    let history = CsvHistory::new(&config.data.csv_path).matches()?;
    let seasons = available_seasons(&history);
    info!(
        "📊 {} matches, {} seasons ({}), {} teams",
        history.len(),
        seasons.len(),
        seasons.join(", "),
        team_names(&history).len()
    );
    if history.is_empty() {
        warn!("⚠️  No usable matches loaded, predictions will fail for every team");
    }
    if !config.data.seasons.is_empty() {
        info!("🗓️  Default seasons: {}", config.data.seasons.join(", "));
    }

    let tracker = match &config.tracker.path {
        Some(path) => PredictionTracker::load(path).await?,
        None => PredictionTracker::new(),
    };
    info!("📈 Prediction history: {} recorded outcomes", tracker.len());

    let state = AppState::new(history, config.api_settings(), tracker);
    let app = create_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.server_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr()))?;
    info!("✅ API listening on http://{}", config.server_addr());
    info!("⌨️  Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
            }
        })
        .await?;

    info!("👋 Shutting down gracefully");
    Ok(())
}
