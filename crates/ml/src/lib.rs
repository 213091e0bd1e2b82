pub mod condition;
pub mod config;
pub mod ensemble;
pub mod form;
pub mod head_to_head;
pub mod home_advantage;
pub mod odds_comparison;
pub mod predictor;
pub mod probability;
pub mod team_stats;

#[cfg(test)]
mod test_support;

pub use condition::*;
pub use config::*;
pub use ensemble::*;
pub use form::*;
pub use head_to_head::*;
pub use home_advantage::*;
pub use odds_comparison::*;
pub use predictor::*;
pub use probability::*;
pub use team_stats::*;
