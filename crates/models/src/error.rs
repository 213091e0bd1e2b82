use thiserror::Error;

#[derive(Error, Debug)]
pub enum FootyError {
    #[error("Team not found in statistics: {team}")]
    UnknownTeam { team: String },

    #[error("Invalid playback speed: x{speed}, expected one of x1, x5, x10, x20")]
    InvalidSpeed { speed: u32 },

    #[error("Cannot {action} a simulation that is {from}")]
    InvalidTransition { from: String, action: String },

    #[error("Invalid odds: {0}")]
    InvalidOdds(String),

    #[error("Invalid probability: {prob}, must be between 0.0 and 100.0")]
    InvalidProbability { prob: f64 },

    #[error("Invalid match record: {0}")]
    InvalidRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FootyError>;
