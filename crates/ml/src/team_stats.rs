//! Season-level home/away summaries per team.

use std::collections::{BTreeMap, BTreeSet};

use footy_models::{FullTimeResult, MatchRecord, TeamStats};
use tracing::debug;

/// Team name → statistics over the selected seasons.
pub type TeamStatsMap = BTreeMap<String, TeamStats>;

#[derive(Debug, Clone, Copy, Default)]
pub struct TeamStatsAggregator {
    extended_profile: bool,
}

impl TeamStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also derive all-venue scoring/conceding averages and draw rate.
    pub fn with_extended_profile(mut self, enabled: bool) -> Self {
        self.extended_profile = enabled;
        self
    }

    /// Recomputes every team's statistics from the matches of `seasons`.
    pub fn aggregate<S: AsRef<str>>(&self, history: &[MatchRecord], seasons: &[S]) -> TeamStatsMap {
        let selected: BTreeSet<&str> = seasons.iter().map(AsRef::as_ref).collect();
        let season_rows: Vec<&MatchRecord> = history
            .iter()
            .filter(|m| selected.contains(m.season.as_str()))
            .collect();

        let teams: BTreeSet<&str> = season_rows
            .iter()
            .flat_map(|m| [m.home_team.as_str(), m.away_team.as_str()])
            .collect();

        let stats: TeamStatsMap = teams
            .into_iter()
            .map(|team| (team.to_string(), self.team_stats(&season_rows, team)))
            .collect();

        debug!(
            "📊 Aggregated {} teams over {} matches ({} seasons)",
            stats.len(),
            season_rows.len(),
            selected.len()
        );
        stats
    }

    fn team_stats(&self, rows: &[&MatchRecord], team: &str) -> TeamStats {
        let home: Vec<&MatchRecord> = rows.iter().copied().filter(|m| m.home_team == team).collect();
        let away: Vec<&MatchRecord> = rows.iter().copied().filter(|m| m.away_team == team).collect();

        let home_wins = count_u32(home.iter().filter(|m| m.result == FullTimeResult::Home).count());
        let away_wins = count_u32(away.iter().filter(|m| m.result == FullTimeResult::Away).count());
        let home_goals: Vec<f64> = home.iter().map(|m| f64::from(m.home_goals)).collect();
        let away_goals: Vec<f64> = away.iter().map(|m| f64::from(m.away_goals)).collect();

        let mut stats = TeamStats {
            total_home_matches: count_u32(home.len()),
            home_wins,
            home_win_rate: ratio(home_wins, home.len()),
            avg_goals_home: mean(&home_goals),
            total_away_matches: count_u32(away.len()),
            away_wins,
            away_win_rate: ratio(away_wins, away.len()),
            avg_goals_away: mean(&away_goals),
            ..TeamStats::default()
        };

        if self.extended_profile {
            let played: Vec<&MatchRecord> = home.iter().chain(away.iter()).copied().collect();
            let scored: Vec<f64> = played.iter().map(|m| f64::from(m.goals_for(team).0)).collect();
            let conceded: Vec<f64> = played.iter().map(|m| f64::from(m.goals_for(team).1)).collect();
            let draws = count_u32(played.iter().filter(|m| m.result == FullTimeResult::Draw).count());

            if !played.is_empty() {
                stats.avg_goals_scored = Some(mean(&scored));
                stats.avg_goals_conceded = Some(mean(&conceded));
                stats.draw_rate = Some(ratio(draws, played.len()));
            }
        }

        stats
    }
}

/// Convenience wrapper over the default aggregator.
pub fn calculate_team_stats<S: AsRef<str>>(history: &[MatchRecord], seasons: &[S]) -> TeamStatsMap {
    TeamStatsAggregator::new().aggregate(history, seasons)
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn ratio(count: u32, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) / total as f64
    }
}

pub(crate) fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
