use std::env;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use footy_api::ApiSettings;
use footy_ml::PredictionConfig;
use footy_models::FootyError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    pub simulation: SimulationConfig,
    pub server: ServerConfig,
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub csv_path: PathBuf,
    #[serde(default)]
    pub seasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub seed: Option<u64>,
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub path: Option<PathBuf>,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .set_default("data.csv_path", "dataset.csv")?
            .set_default("data.seasons", Vec::<String>::new())?
            .set_default("simulation.tick_ms", 1000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("tracker.path", "prediction_history.json")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // FOOTY__SERVER__PORT=9000 etc.
            .add_source(
                Environment::with_prefix("FOOTY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("data.seasons"),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), FootyError> {
        let p = &self.prediction;
        if p.form_window == 0 {
            return Err(FootyError::Config("prediction.form_window must be positive".into()));
        }
        if p.min_confidence > p.max_confidence {
            return Err(FootyError::Config(format!(
                "prediction.min_confidence ({}) exceeds max_confidence ({})",
                p.min_confidence, p.max_confidence
            )));
        }
        if self.simulation.tick_ms == 0 {
            return Err(FootyError::Config("simulation.tick_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            prediction: self.prediction.clone(),
            default_seasons: self.data.seasons.clone(),
            seed: self.simulation.seed,
            tracker_path: self.tracker.path.clone(),
            tick_ms: self.simulation.tick_ms,
        }
    }
}
