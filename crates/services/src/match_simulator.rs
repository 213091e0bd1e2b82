use footy_models::{EventKind, MatchEvent, MatchStats, SimulatedMatch, StatLine};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// 15-minute windows and the share of expected goals each receives.
pub const GOAL_BUCKETS: [(u8, u8, f64); 6] = [
    (0, 15, 0.15),
    (15, 30, 0.20),
    (30, 45, 0.15),
    (45, 60, 0.20),
    (60, 75, 0.20),
    (75, 90, 0.25),
];

const RED_CARD_PROBABILITY: f64 = 0.3;

/// Generates full match timelines from expected goals.
pub struct MatchSimulator<R: Rng = SmallRng> {
    rng: R,
}

impl MatchSimulator<SmallRng> {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for MatchSimulator<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MatchSimulator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Builds the event timeline, final score and full-time statistics.
    pub fn simulate(
        &mut self,
        home_team: &str,
        away_team: &str,
        expected_home_goals: f64,
        expected_away_goals: f64,
    ) -> SimulatedMatch {
        let mut events = Vec::new();
        let mut home_score = 0;
        let mut away_score = 0;

        for (start, end, weight) in GOAL_BUCKETS {
            for _ in 0..self.bucket_goals(expected_home_goals, weight) {
                events.push(self.goal(home_team, start, end));
                home_score += 1;
            }
            for _ in 0..self.bucket_goals(expected_away_goals, weight) {
                events.push(self.goal(away_team, start, end));
                away_score += 1;
            }
        }

        let yellow_cards = self.rng.gen_range(2..6);
        for _ in 0..yellow_cards {
            let minute = self.rng.gen_range(5..88);
            let team = self.pick_team(home_team, away_team);
            events.push(self.player_event(minute, EventKind::YellowCard, team));
        }

        if self.rng.gen::<f64>() < RED_CARD_PROBABILITY {
            let minute = self.rng.gen_range(20..85);
            let team = self.pick_team(home_team, away_team);
            events.push(self.player_event(minute, EventKind::RedCard, team));
        }

        let substitutions = self.rng.gen_range(4..6);
        for _ in 0..substitutions {
            let minute = self.rng.gen_range(45..85);
            let team = self.pick_team(home_team, away_team);
            let off: u8 = self.rng.gen_range(1..11);
            let on: u8 = self.rng.gen_range(12..23);
            events.push(MatchEvent::new(
                minute,
                EventKind::Substitution,
                team,
                format!("Player {off} → Player {on}"),
            ));
        }

        // Stable: same-minute events keep generation order
        events.sort_by_key(|e| e.minute);

        let stats = self.final_stats();
        info!(
            "🎮 Simulated {} {} - {} {} ({} events)",
            home_team,
            home_score,
            away_score,
            away_team,
            events.len()
        );

        SimulatedMatch {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            events,
            final_home_score: home_score,
            final_away_score: away_score,
            stats,
        }
    }

    /// `floor(xg × w)` goals plus one more with probability equal to the remainder.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn bucket_goals(&mut self, expected_goals: f64, weight: f64) -> u32 {
        let share = expected_goals.max(0.0) * weight;
        let whole = share.floor();
        let extra = u32::from(self.rng.gen::<f64>() < share - whole);
        whole as u32 + extra
    }

    fn goal(&mut self, team: &str, start: u8, end: u8) -> MatchEvent {
        let minute = self.rng.gen_range(start..end);
        self.player_event(minute, EventKind::Goal, team)
    }

    fn player_event(&mut self, minute: u8, kind: EventKind, team: &str) -> MatchEvent {
        let player: u8 = self.rng.gen_range(1..11);
        MatchEvent::new(minute, kind, team, format!("Player {player}"))
    }

    fn pick_team<'a>(&mut self, home_team: &'a str, away_team: &'a str) -> &'a str {
        if self.rng.gen_bool(0.5) {
            home_team
        } else {
            away_team
        }
    }

    fn final_stats(&mut self) -> MatchStats {
        let home_possession = self.rng.gen_range(35..65);
        MatchStats {
            possession: StatLine::new(home_possession, 100 - home_possession),
            shots: self.stat_pair(8, 20),
            shots_on_target: self.stat_pair(3, 8),
            corners: self.stat_pair(2, 12),
            fouls: self.stat_pair(8, 18),
            offside: self.stat_pair(0, 5),
        }
    }

    fn stat_pair(&mut self, low: u32, high: u32) -> StatLine {
        StatLine::new(self.rng.gen_range(low..high), self.rng.gen_range(low..high))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_bounds() {
        let mut simulator = MatchSimulator::seeded(42);
        for _ in 0..200 {
            let sim = simulator.simulate("Genk", "Gent", 1.8, 1.1);

            assert!((2..=5).contains(&sim.count(EventKind::YellowCard)));
            assert!(sim.count(EventKind::RedCard) <= 1);
            assert!((4..=5).contains(&sim.count(EventKind::Substitution)));
            assert!(sim.events.iter().all(|e| e.minute < 90));
            assert!(sim.events.windows(2).all(|w| w[0].minute <= w[1].minute));

            let home_goals = sim.events.iter().filter(|e| e.is_goal() && e.team == "Genk").count();
            let away_goals = sim.events.iter().filter(|e| e.is_goal() && e.team == "Gent").count();
            assert_eq!(home_goals, sim.final_home_score as usize);
            assert_eq!(away_goals, sim.final_away_score as usize);
        }
    }

    #[test]
    fn test_stat_ranges() {
        let mut simulator = MatchSimulator::seeded(9);
        for _ in 0..200 {
            let stats = simulator.simulate("Genk", "Gent", 1.5, 1.5).stats;
            assert_eq!(stats.possession.home + stats.possession.away, 100);
            assert!((35..65).contains(&stats.possession.home));
            assert!((8..20).contains(&stats.shots.home) && (8..20).contains(&stats.shots.away));
            assert!((3..8).contains(&stats.shots_on_target.away));
            assert!((2..12).contains(&stats.corners.home));
            assert!((8..18).contains(&stats.fouls.away));
            assert!(stats.offside.home < 5);
        }
    }

    #[test]
    fn test_goal_counts_follow_expected_goals() {
        let mut simulator = MatchSimulator::seeded(1);

        // Zero expected goals never scores
        let sim = simulator.simulate("Genk", "Gent", 0.0, 0.0);
        assert_eq!(sim.final_home_score + sim.final_away_score, 0);

        // Whole shares are deterministic: 20 × weights = 3, 4, 3, 4, 4, 5
        let sim = simulator.simulate("Genk", "Gent", 20.0, 0.0);
        assert_eq!(sim.final_home_score, 23);
        for (start, end, weight) in GOAL_BUCKETS {
            let in_bucket = sim
                .events
                .iter()
                .filter(|e| e.is_goal() && e.minute >= start && e.minute < end)
                .count();
            assert_eq!(in_bucket as f64, (20.0 * weight).round());
        }
    }

    #[test]
    fn test_red_card_rate() {
        let mut simulator = MatchSimulator::seeded(2024);
        let runs = 2000;
        let reds: usize = (0..runs)
            .map(|_| simulator.simulate("Genk", "Gent", 1.0, 1.0).count(EventKind::RedCard))
            .sum();
        let rate = reds as f64 / runs as f64;
        assert!((rate - 0.3).abs() < 0.05, "red card rate {rate}");
    }

    #[test]
    fn test_substitution_labels() {
        let mut simulator = MatchSimulator::seeded(5);
        let sim = simulator.simulate("Genk", "Gent", 1.0, 1.0);
        let sub = sim
            .events
            .iter()
            .find(|e| e.kind == EventKind::Substitution)
            .unwrap();
        assert!(sub.actor.starts_with("Player "));
        assert!(sub.actor.contains(" → Player "));
        assert!((45..85).contains(&sub.minute));
    }
}
