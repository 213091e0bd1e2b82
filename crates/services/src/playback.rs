//! Minute-by-minute reveal of a simulated match.

use std::time::Duration;

use footy_models::{FootyError, MatchEvent, MatchStats, Result, SimulatedMatch, FULL_TIME};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub enum PlaybackSpeed {
    X1,
    X5,
    X10,
    X20,
}

impl PlaybackSpeed {
    /// Simulated minutes per tick.
    pub fn minutes_per_tick(self) -> u8 {
        match self {
            Self::X1 => 1,
            Self::X5 => 5,
            Self::X10 => 10,
            Self::X20 => 20,
        }
    }

    /// Wall-clock time between ticks when one tick at x1 takes `base`.
    pub fn tick_interval(self, base: Duration) -> Duration {
        base / u32::from(self.minutes_per_tick())
    }
}

impl TryFrom<u32> for PlaybackSpeed {
    type Error = FootyError;

    fn try_from(speed: u32) -> Result<Self> {
        match speed {
            1 => Ok(Self::X1),
            5 => Ok(Self::X5),
            10 => Ok(Self::X10),
            20 => Ok(Self::X20),
            _ => Err(FootyError::InvalidSpeed { speed }),
        }
    }
}

impl From<PlaybackSpeed> for u32 {
    fn from(speed: PlaybackSpeed) -> Self {
        u32::from(speed.minutes_per_tick())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    #[default]
    NotStarted,
    Running,
    Finished,
}

impl PlaybackPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Running => "running",
            Self::Finished => "finished",
        }
    }
}

/// What changed during one tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickUpdate {
    pub minute: u8,
    pub new_events: Vec<MatchEvent>,
    pub home_score: u32,
    pub away_score: u32,
    pub stats: MatchStats,
    pub phase: PlaybackPhase,
}

/// Serializable view of a playback session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackSnapshot {
    pub phase: PlaybackPhase,
    pub speed: Option<PlaybackSpeed>,
    pub current_minute: u8,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_score: u32,
    pub away_score: u32,
    pub events: Vec<MatchEvent>,
    pub stats: Option<MatchStats>,
}

/// Playback of one simulated match, owned by a single viewer.
#[derive(Debug, Clone, Default)]
pub struct MatchSimulationState {
    phase: PlaybackPhase,
    speed: Option<PlaybackSpeed>,
    current_minute: u8,
    simulation: Option<SimulatedMatch>,
    revealed: usize,
    home_score: u32,
    away_score: u32,
}

impl MatchSimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn speed(&self) -> Option<PlaybackSpeed> {
        self.speed
    }

    pub fn current_minute(&self) -> u8 {
        self.current_minute
    }

    pub fn score(&self) -> (u32, u32) {
        (self.home_score, self.away_score)
    }

    pub fn simulation(&self) -> Option<&SimulatedMatch> {
        self.simulation.as_ref()
    }

    pub fn revealed_events(&self) -> &[MatchEvent] {
        self.simulation
            .as_ref()
            .map_or(&[], |sim| &sim.events[..self.revealed])
    }

    pub fn displayed_stats(&self) -> Option<MatchStats> {
        self.simulation
            .as_ref()
            .map(|sim| sim.stats.at_minute(self.current_minute))
    }

    /// NotStarted → Running with a freshly generated match.
    pub fn start(&mut self, simulation: SimulatedMatch, speed: PlaybackSpeed) -> Result<()> {
        if self.phase != PlaybackPhase::NotStarted {
            return Err(self.invalid("start"));
        }

        info!(
            "▶️  Playback started: {} vs {} at x{}",
            simulation.home_team,
            simulation.away_team,
            speed.minutes_per_tick()
        );
        self.simulation = Some(simulation);
        self.speed = Some(speed);
        self.current_minute = 0;
        self.revealed = 0;
        self.home_score = 0;
        self.away_score = 0;
        self.phase = PlaybackPhase::Running;
        Ok(())
    }

    /// Advances the clock by one speed step and reveals the events now due.
    pub fn tick(&mut self) -> Result<TickUpdate> {
        if self.phase != PlaybackPhase::Running {
            return Err(self.invalid("tick"));
        }
        let (Some(sim), Some(speed)) = (self.simulation.as_ref(), self.speed) else {
            return Err(self.invalid("tick"));
        };

        self.current_minute = self
            .current_minute
            .saturating_add(speed.minutes_per_tick())
            .min(FULL_TIME);

        let due = sim.events[self.revealed..]
            .iter()
            .take_while(|e| e.minute <= self.current_minute)
            .count();
        let new_events = sim.events[self.revealed..self.revealed + due].to_vec();
        self.revealed += due;

        for event in new_events.iter().filter(|e| e.is_goal()) {
            if event.team == sim.home_team {
                self.home_score += 1;
            } else {
                self.away_score += 1;
            }
        }

        let stats = sim.stats.at_minute(self.current_minute);
        if self.current_minute >= FULL_TIME {
            self.phase = PlaybackPhase::Finished;
            info!(
                "🏁 Full time: {} {} - {} {}",
                sim.home_team, self.home_score, self.away_score, sim.away_team
            );
        } else if !new_events.is_empty() {
            debug!("⏱️  {}' revealed {} event(s)", self.current_minute, new_events.len());
        }

        Ok(TickUpdate {
            minute: self.current_minute,
            new_events,
            home_score: self.home_score,
            away_score: self.away_score,
            stats,
            phase: self.phase,
        })
    }

    /// Back to NotStarted, discarding the simulated match.
    pub fn reset(&mut self) {
        debug!("🔄 Playback reset from {}", self.phase.as_str());
        *self = Self::default();
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            phase: self.phase,
            speed: self.speed,
            current_minute: self.current_minute,
            home_team: self.simulation.as_ref().map(|s| s.home_team.clone()),
            away_team: self.simulation.as_ref().map(|s| s.away_team.clone()),
            home_score: self.home_score,
            away_score: self.away_score,
            events: self.revealed_events().to_vec(),
            stats: self.displayed_stats(),
        }
    }

    fn invalid(&self, action: &str) -> FootyError {
        FootyError::InvalidTransition {
            from: self.phase.as_str().to_string(),
            action: action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_simulator::MatchSimulator;
    use footy_models::{EventKind, StatLine};
    use proptest::prelude::*;

    fn fixed_match() -> SimulatedMatch {
        SimulatedMatch {
            home_team: "Genk".to_string(),
            away_team: "Gent".to_string(),
            events: vec![
                MatchEvent::new(3, EventKind::Goal, "Genk", "Player 9"),
                MatchEvent::new(5, EventKind::YellowCard, "Gent", "Player 4"),
                MatchEvent::new(5, EventKind::Goal, "Gent", "Player 7"),
                MatchEvent::new(62, EventKind::Substitution, "Genk", "Player 2 → Player 14"),
                MatchEvent::new(89, EventKind::Goal, "Genk", "Player 10"),
            ],
            final_home_score: 2,
            final_away_score: 1,
            stats: MatchStats {
                possession: StatLine::new(55, 45),
                shots: StatLine::new(14, 9),
                ..MatchStats::default()
            },
        }
    }

    #[test]
    fn test_speed_parsing() {
        assert_eq!(PlaybackSpeed::try_from(10).unwrap(), PlaybackSpeed::X10);
        assert!(matches!(
            PlaybackSpeed::try_from(3),
            Err(FootyError::InvalidSpeed { speed: 3 })
        ));
        assert_eq!(
            PlaybackSpeed::X20.tick_interval(Duration::from_millis(1000)),
            Duration::from_millis(50)
        );
    }

    #[test]
    fn test_tick_reveals_due_events() {
        let mut state = MatchSimulationState::new();
        state.start(fixed_match(), PlaybackSpeed::X5).unwrap();

        let first = state.tick().unwrap();
        assert_eq!(first.minute, 5);
        assert_eq!(first.new_events.len(), 3);
        assert_eq!((first.home_score, first.away_score), (1, 1));
        assert_eq!(first.stats.possession, StatLine::new(3, 2));
        assert_eq!(first.phase, PlaybackPhase::Running);

        let second = state.tick().unwrap();
        assert_eq!(second.minute, 10);
        assert!(second.new_events.is_empty());
    }

    #[test]
    fn test_runs_to_full_time() {
        let mut state = MatchSimulationState::new();
        state.start(fixed_match(), PlaybackSpeed::X20).unwrap();

        let minutes: Vec<u8> = (0..5).map(|_| state.tick().unwrap().minute).collect();
        assert_eq!(minutes, vec![20, 40, 60, 80, 90]);
        assert_eq!(state.phase(), PlaybackPhase::Finished);
        assert_eq!(state.score(), (2, 1));
        assert_eq!(state.revealed_events().len(), 5);
        assert_eq!(state.displayed_stats().unwrap(), fixed_match().stats);

        assert!(matches!(state.tick(), Err(FootyError::InvalidTransition { .. })));
    }

    #[test]
    fn test_lifecycle_errors_and_reset() {
        let mut state = MatchSimulationState::new();
        assert!(state.tick().is_err());

        state.start(fixed_match(), PlaybackSpeed::X1).unwrap();
        assert!(state.start(fixed_match(), PlaybackSpeed::X1).is_err());

        state.tick().unwrap();
        state.reset();
        assert_eq!(state.phase(), PlaybackPhase::NotStarted);
        assert_eq!(state.current_minute(), 0);
        assert!(state.simulation().is_none());
        assert!(state.displayed_stats().is_none());

        state.start(fixed_match(), PlaybackSpeed::X10).unwrap();
        assert_eq!(state.phase(), PlaybackPhase::Running);
    }

    #[test]
    fn test_snapshot() {
        let mut state = MatchSimulationState::new();
        state.start(fixed_match(), PlaybackSpeed::X5).unwrap();
        state.tick().unwrap();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.home_team.as_deref(), Some("Genk"));
        assert_eq!(snapshot.events.len(), 3);
        assert_eq!(snapshot.speed, Some(PlaybackSpeed::X5));
    }

    proptest! {
        #[test]
        fn prop_playback_is_monotonic(seed in any::<u64>(), speed_idx in 0usize..4) {
            let speed = [PlaybackSpeed::X1, PlaybackSpeed::X5, PlaybackSpeed::X10, PlaybackSpeed::X20][speed_idx];
            let sim = MatchSimulator::seeded(seed).simulate("Genk", "Gent", 2.5, 1.5);
            let mut state = MatchSimulationState::new();
            state.start(sim, speed).unwrap();

            let mut last_minute = 0;
            let mut last_shots = StatLine::default();
            let mut last_revealed = 0;
            while state.phase() == PlaybackPhase::Running {
                let update = state.tick().unwrap();
                prop_assert!(update.minute >= last_minute);
                prop_assert!(update.minute <= FULL_TIME);
                prop_assert!(update.stats.shots.home >= last_shots.home);
                prop_assert!(update.stats.shots.away >= last_shots.away);
                prop_assert!(state.revealed_events().len() >= last_revealed);
                last_minute = update.minute;
                last_shots = update.stats.shots;
                last_revealed = state.revealed_events().len();
            }
            prop_assert_eq!(last_minute, FULL_TIME);
            let sim = state.simulation().unwrap();
            prop_assert_eq!(state.score(), (sim.final_home_score, sim.final_away_score));
        }
    }
}
