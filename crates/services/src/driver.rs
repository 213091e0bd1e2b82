use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::playback::{MatchSimulationState, PlaybackPhase, TickUpdate};

#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Duration of one tick at x1.
    pub tick_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { tick_ms: 1000 }
    }
}

/// Pushes playback ticks to a channel at the session's speed.
pub struct PlaybackDriver {
    config: DriverConfig,
}

impl PlaybackDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Ticks `state` until full time, cancellation or a dropped receiver.
    ///
    /// Returns the state so the caller can inspect or reset it.
    pub async fn run(
        &self,
        mut state: MatchSimulationState,
        sender: mpsc::UnboundedSender<TickUpdate>,
        cancel: CancellationToken,
    ) -> Result<MatchSimulationState> {
        let speed = state
            .speed()
            .context("playback must be started before driving it")?;
        let period = speed.tick_interval(Duration::from_millis(self.config.tick_ms));
        info!("🎬 Driving playback at x{} ({:?} per tick)", speed.minutes_per_tick(), period);

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately
        ticker.tick().await;

        while state.phase() == PlaybackPhase::Running {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("⏹️  Playback cancelled at {}'", state.current_minute());
                    break;
                }
                _ = ticker.tick() => {
                    let update = state.tick().context("playback tick failed")?;
                    if sender.send(update).is_err() {
                        debug!("📭 Playback receiver dropped at {}'", state.current_minute());
                        break;
                    }
                }
            }
        }

        Ok(state)
    }
}
