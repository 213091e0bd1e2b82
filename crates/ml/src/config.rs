use serde::{Deserialize, Serialize};

use crate::form::DEFAULT_FORM_WINDOW;
use crate::head_to_head::DEFAULT_H2H_LOOKBACK;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictionConfig {
    pub form_window: usize,
    pub h2h_lookback: usize,
    pub base_confidence: f64,
    pub h2h_bonus: f64,
    pub h2h_bonus_min_matches: u32,
    pub min_confidence: f64,
    pub max_confidence: f64,
    pub use_advanced: bool,
    pub extended_profile: bool,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            form_window: DEFAULT_FORM_WINDOW,
            h2h_lookback: DEFAULT_H2H_LOOKBACK,
            base_confidence: 75.0,
            h2h_bonus: 10.0,
            h2h_bonus_min_matches: 5,
            min_confidence: 45.0,
            max_confidence: 100.0,
            use_advanced: true,
            extended_profile: false,
        }
    }
}
