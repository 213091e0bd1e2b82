use serde::{Deserialize, Serialize};

/// Last minute of regulation time.
pub const FULL_TIME: u8 = 90;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Goal,
    YellowCard,
    RedCard,
    Substitution,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Goal => "GOAL!",
            Self::YellowCard => "Yellow card",
            Self::RedCard => "Red card",
            Self::Substitution => "Substitution",
        }
    }
}

/// A discrete, timestamped match incident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEvent {
    pub minute: u8,
    pub kind: EventKind,
    pub team: String,
    /// Free-text player label, e.g. `Player 7` or `Player 4 → Player 15`.
    pub actor: String,
    pub description: String,
}

impl MatchEvent {
    pub fn new(minute: u8, kind: EventKind, team: impl Into<String>, actor: impl Into<String>) -> Self {
        let team = team.into();
        let description = format!("{} - {}", kind.label(), team);
        Self {
            minute,
            kind,
            team,
            actor: actor.into(),
            description,
        }
    }

    pub fn is_goal(&self) -> bool {
        self.kind == EventKind::Goal
    }
}

/// One statistic for both sides.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatLine {
    pub home: u32,
    pub away: u32,
}

impl StatLine {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Share of the final value reached by `minute`: `floor(value × minute / 90)`.
    pub fn scaled(self, minute: u8) -> Self {
        let minute = u32::from(minute.min(FULL_TIME));
        let scale = |value: u32| value * minute / u32::from(FULL_TIME);
        Self {
            home: scale(self.home),
            away: scale(self.away),
        }
    }
}

/// Full-time team statistics of a simulated match.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchStats {
    pub possession: StatLine,
    pub shots: StatLine,
    pub shots_on_target: StatLine,
    pub corners: StatLine,
    pub fouls: StatLine,
    pub offside: StatLine,
}

impl MatchStats {
    /// Statistics as displayed at `minute` during playback.
    pub fn at_minute(&self, minute: u8) -> Self {
        Self {
            possession: self.possession.scaled(minute),
            shots: self.shots.scaled(minute),
            shots_on_target: self.shots_on_target.scaled(minute),
            corners: self.corners.scaled(minute),
            fouls: self.fouls.scaled(minute),
            offside: self.offside.scaled(minute),
        }
    }
}

/// Complete generated match: timeline ordered by minute, score and statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulatedMatch {
    pub home_team: String,
    pub away_team: String,
    pub events: Vec<MatchEvent>,
    pub final_home_score: u32,
    pub final_away_score: u32,
    pub stats: MatchStats,
}

impl SimulatedMatch {
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_description() {
        let event = MatchEvent::new(12, EventKind::Goal, "Genk", "Player 9");
        assert_eq!(event.description, "GOAL! - Genk");
        assert!(event.is_goal());
    }

    #[test]
    fn test_stat_scaling_truncates() {
        let line = StatLine::new(17, 5);
        assert_eq!(line.scaled(0), StatLine::new(0, 0));
        assert_eq!(line.scaled(45), StatLine::new(8, 2));
        assert_eq!(line.scaled(90), line);
        assert_eq!(line.scaled(120), line);
    }
}
